//! Entry DTOs - Data Transfer Objects per le voci di lavoro
//!
//! I campi obbligatori sono `Option` così che la loro assenza produca un 400
//! con messaggio leggibile invece del rifiuto generico dell'estrattore JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body di POST /api/entry/start
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct StartShiftDTO {
    pub operator: Option<String>,
    pub cantiere: Option<String>,
    pub macchina: Option<String>,
    pub linea: Option<String>,
    pub start_time: Option<String>,
    pub descrizione: Option<String>,
    pub location: Option<String>,
}

/// Body di POST /api/entry/finish
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct FinishShiftDTO {
    pub entry_id: Option<i64>,
    pub end_time: Option<String>,
    pub break_minutes: Option<i64>,
    pub transfer_minutes: Option<i64>,
    pub descrizione: Option<String>,
    pub location: Option<String>,
}

/// Body di POST /api/entry: variante a orari (startTime/endTime/breakMinutes)
/// oppure variante storica con ore esplicite e data.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryDTO {
    pub operator: Option<String>,
    pub cantiere: Option<String>,
    pub macchina: Option<String>,
    pub linea: Option<String>,
    /// numero o stringa numerica
    pub ore: Option<Value>,
    /// DD/MM/YYYY
    pub data: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub break_minutes: Option<i64>,
    pub transfer_minutes: Option<i64>,
    pub descrizione: Option<String>,
    pub location: Option<String>,
}

/// DTO per inserire una nuova voce (senza id); `data_dmy` viene derivata da `work_date`
#[derive(Debug, Clone)]
pub struct NewEntryDTO {
    pub operator: String,
    pub cantiere: String,
    pub macchina: String,
    pub linea: String,
    pub ore: f64,
    pub work_date: NaiveDate,
    pub descrizione: String,
    pub location: Option<String>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub break_minutes: Option<i64>,
    pub transfer_minutes: Option<i64>,
}

/// Campi scritti alla chiusura di un turno aperto
#[derive(Debug, Clone)]
pub struct CloseEntryDTO {
    pub end_time: String,
    pub ore: f64,
    pub break_minutes: i64,
    pub transfer_minutes: i64,
    pub descrizione: String,
    pub location: Option<String>,
    pub end_location: Option<String>,
}

/// Body di POST /api/entries/search (date in DD/MM/YYYY)
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntriesDTO {
    pub cantiere: Option<String>,
    pub macchina: Option<String>,
    pub linea: Option<String>,
    pub operator: Option<String>,
    pub descr_contains: Option<String>,
    pub data_from: Option<String>,
    pub data_to: Option<String>,
}

/// Body di POST /api/entries/delete-bulk
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BulkDeleteDTO {
    #[serde(default)]
    pub ids: Vec<i64>,
}
