//! Export dei risultati di ricerca in CSV e XLSX

pub mod csv;
pub mod xlsx;

pub use self::csv::render_csv;
pub use self::xlsx::render_xlsx;

use crate::dtos::ExportRow;
use crate::geo::{Clock, GeocodeBackend, GeocodeBatch};
use thiserror::Error;

pub const HEADERS: [&str; 15] = [
    "Operatore",
    "Cantiere",
    "Macchina",
    "Linea",
    "Ore",
    "Data",
    "Inizio",
    "Fine",
    "Pausa (min)",
    "Trasferimento (min)",
    "Descrizione",
    "Posizione",
    "Posizione inizio",
    "Posizione fine",
    "ID",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Celle di una riga, nell'ordine di `HEADERS`
pub fn row_cells(row: &ExportRow) -> [String; 15] {
    [
        text(&row.operator),
        text(&row.cantiere),
        text(&row.macchina),
        text(&row.linea),
        row.ore.map(|ore| format!("{:.2}", ore)).unwrap_or_default(),
        text(&row.data_dmy),
        text(&row.start_time),
        text(&row.end_time),
        number(row.break_minutes),
        number(row.transfer_minutes),
        text(&row.descrizione),
        text(&row.location),
        text(&row.start_location),
        text(&row.end_location),
        number(row.id),
    ]
}

/// Sostituisce le coordinate nelle colonne di posizione con il nome del luogo
pub async fn geocode_locations<B: GeocodeBackend, C: Clock>(
    rows: &mut [ExportRow],
    batch: &mut GeocodeBatch<'_, B, C>,
) {
    for row in rows.iter_mut() {
        for cell in [&mut row.location, &mut row.start_location, &mut row.end_location] {
            if let Some(raw) = cell.as_deref() {
                let resolved = batch.resolve(raw).await;
                *cell = Some(resolved);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_follow_header_order_and_format_hours() {
        let row = ExportRow {
            id: Some(12),
            operator: Some("MARIO ROSSI".to_string()),
            ore: Some(8.5),
            data_dmy: Some("03/03/2025".to_string()),
            break_minutes: Some(30),
            ..Default::default()
        };
        let cells = row_cells(&row);
        assert_eq!(cells.len(), HEADERS.len());
        assert_eq!(cells[0], "MARIO ROSSI");
        assert_eq!(cells[4], "8.50");
        assert_eq!(cells[5], "03/03/2025");
        assert_eq!(cells[8], "30");
        assert_eq!(cells[9], "");
        assert_eq!(cells[14], "12");
    }
}
