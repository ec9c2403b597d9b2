//! Entry services - Turni dell'operatore e gestione admin delle voci

use super::geo::request_ip;
use crate::core::{AppError, AppState, require_operator};
use crate::dtos::{
    BulkDeleteDTO, CreateEntryDTO, FinishShiftDTO, SearchEntriesDTO, StartShiftDTO, StatusQuery,
};
use crate::entities::User;
use crate::repositories::{Delete, EntryFilter};
use crate::shift::FinishOutcome;
use crate::utils::date::parse_dmy;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::{Extensions, HeaderMap},
};
use axum_macros::debug_handler;
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// L'operatore indicato nel body deve essere quello dell'utente in sessione
fn check_operator(user: &User, operator: &Option<String>) -> Result<(), AppError> {
    match operator.as_deref().map(str::trim).filter(|o| !o.is_empty()) {
        Some(operator) => require_operator(user, operator),
        // campo mancante: ci pensa la validazione del servizio
        None => Ok(()),
    }
}

fn finish_response(outcome: FinishOutcome) -> Json<Value> {
    Json(json!({
        "ok": true,
        "entry": outcome.entry,
        "durationWarning": outcome.duration_warning,
    }))
}

#[debug_handler]
#[instrument(skip(state, current_user, headers, extensions, body), fields(user_id = %current_user.id))]
pub async fn start_shift(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    headers: HeaderMap,
    extensions: Extensions,
    Json(mut body): Json<StartShiftDTO>,
) -> Result<Json<Value>, AppError> {
    // 1. Verificare che l'utente possa agire per l'operatore richiesto
    // 2. Risolvere la posizione (esplicita, altrimenti dall'IP)
    // 3. Aprire il turno; un turno già aperto produce 409 con la voce esistente
    check_operator(&current_user, &body.operator)?;

    let ip = request_ip(&headers, &extensions);
    body.location = state.locations.resolve(body.location.as_deref(), &ip).await;

    let entry = state.shifts.start(&body).await?;
    info!("Shift {} opened for {}", entry.id, entry.operator);
    Ok(Json(json!({ "ok": true, "entry": entry })))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn shift_status(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Value>, AppError> {
    let operator = match query.operator.as_deref().map(str::trim).filter(|o| !o.is_empty()) {
        Some(operator) => {
            require_operator(&current_user, operator)?;
            operator.to_string()
        }
        None => current_user.operator_name.clone(),
    };
    let entry = state.shifts.status(&operator).await?;
    debug!("Open shift for {}: {:?}", operator, entry.as_ref().map(|e| e.id));
    Ok(Json(json!({ "entry": entry })))
}

#[debug_handler]
#[instrument(skip(state, current_user, headers, extensions, body), fields(user_id = %current_user.id))]
pub async fn finish_shift(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    headers: HeaderMap,
    extensions: Extensions,
    Json(mut body): Json<FinishShiftDTO>,
) -> Result<Json<Value>, AppError> {
    let ip = request_ip(&headers, &extensions);
    body.location = state.locations.resolve(body.location.as_deref(), &ip).await;

    let outcome = state
        .shifts
        .finish(&body, Some(&current_user.operator_name))
        .await?;
    info!("Shift {} closed with {} hours", outcome.entry.id, outcome.entry.ore);
    Ok(finish_response(outcome))
}

/// Voce già chiusa in un'unica chiamata (inserimento manuale)
#[debug_handler]
#[instrument(skip(state, current_user, headers, extensions, body), fields(user_id = %current_user.id))]
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    headers: HeaderMap,
    extensions: Extensions,
    Json(mut body): Json<CreateEntryDTO>,
) -> Result<Json<Value>, AppError> {
    check_operator(&current_user, &body.operator)?;

    let ip = request_ip(&headers, &extensions);
    body.location = state.locations.resolve(body.location.as_deref(), &ip).await;

    let outcome = state.shifts.create_one_shot(&body).await?;
    Ok(finish_response(outcome))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn optional_date(value: Option<String>) -> Result<Option<NaiveDate>, AppError> {
    match optional_text(value) {
        Some(raw) => parse_dmy(&raw)
            .map(Some)
            .ok_or_else(|| AppError::bad_request("Formato data non valido (usa DD/MM/YYYY).")),
        None => Ok(None),
    }
}

impl TryFrom<SearchEntriesDTO> for EntryFilter {
    type Error = AppError;

    fn try_from(dto: SearchEntriesDTO) -> Result<Self, Self::Error> {
        Ok(Self {
            cantiere: optional_text(dto.cantiere),
            macchina: optional_text(dto.macchina),
            linea: optional_text(dto.linea),
            operator: optional_text(dto.operator),
            descr_contains: optional_text(dto.descr_contains),
            date_from: optional_date(dto.data_from)?,
            date_to: optional_date(dto.data_to)?,
        })
    }
}

#[instrument(skip(state))]
pub async fn search_entries(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchEntriesDTO>,
) -> Result<Json<Value>, AppError> {
    let filter = EntryFilter::try_from(body)?;
    let entries = state.entry.search(&filter).await?;
    info!("Search returned {} entries", entries.len());
    Ok(Json(json!({ "entries": entries })))
}

#[instrument(skip(state), fields(entry_id = %entry_id))]
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(entry_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !state.entry.delete(&entry_id).await? {
        warn!("Entry not found");
        return Err(AppError::not_found("Voce non trovata."));
    }
    info!("Entry deleted");
    Ok(Json(json!({ "ok": true, "deleted": 1 })))
}

#[instrument(skip(state, body), fields(requested = body.ids.len()))]
pub async fn delete_entries_bulk(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BulkDeleteDTO>,
) -> Result<Json<Value>, AppError> {
    if body.ids.is_empty() {
        return Err(AppError::bad_request("Nessuna voce selezionata."));
    }
    let deleted = state.entry.delete_many(&body.ids).await?;
    Ok(Json(json!({ "ok": true, "deleted": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_dto_becomes_filter_with_blank_fields_dropped() {
        let dto = SearchEntriesDTO {
            cantiere: Some("  ".to_string()),
            operator: Some(" rossi ".to_string()),
            data_from: Some("01/03/2025".to_string()),
            ..Default::default()
        };
        let filter = EntryFilter::try_from(dto).unwrap();
        assert!(filter.cantiere.is_none());
        assert_eq!(filter.operator.as_deref(), Some("rossi"));
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert!(filter.date_to.is_none());
    }

    #[test]
    fn malformed_search_date_is_rejected() {
        let dto = SearchEntriesDTO {
            data_to: Some("2025-03-01".to_string()),
            ..Default::default()
        };
        let err = EntryFilter::try_from(dto).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
