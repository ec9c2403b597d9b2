//! Export services - Download CSV e XLSX delle voci selezionate nel pannello admin

use crate::core::{AppError, AppState};
use crate::dtos::{ExportDTO, ExportRow};
use crate::export::{geocode_locations, render_csv, render_xlsx};
use axum::{
    extract::{Json, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Righe pronte per l'export, con le coordinate tradotte in luoghi se abilitato
async fn prepare_rows(state: &AppState, mut rows: Vec<ExportRow>) -> Vec<ExportRow> {
    if state.config.export_reverse_geocode {
        let mut batch = state.geocoder.batch();
        geocode_locations(&mut rows, &mut batch).await;
        debug!("Reverse geocoded {} distinct points", batch.cached());
    }
    rows
}

#[instrument(skip(state, body), fields(rows = body.entries.len()))]
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExportDTO>,
) -> Result<impl IntoResponse, AppError> {
    let rows = prepare_rows(&state, body.entries).await;
    let bytes = render_csv(&rows)?;
    info!("CSV export of {} rows", rows.len());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"report.csv\""),
        ],
        bytes,
    ))
}

#[instrument(skip(state, body), fields(rows = body.entries.len()))]
pub async fn export_xlsx(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExportDTO>,
) -> Result<impl IntoResponse, AppError> {
    let rows = prepare_rows(&state, body.entries).await;
    let bytes = render_xlsx(&rows)?;
    info!("XLSX export of {} rows", rows.len());
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"report.xlsx\""),
        ],
        bytes,
    ))
}
