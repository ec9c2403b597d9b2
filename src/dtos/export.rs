//! Export DTOs - Righe inviate dal pannello admin per l'esportazione

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ExportDTO {
    #[serde(default)]
    pub entries: Vec<ExportRow>,
}

/// Una riga da esportare; il client rimanda le voci ottenute dalla ricerca,
/// quindi ogni campo è facoltativo.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ExportRow {
    pub id: Option<i64>,
    pub operator: Option<String>,
    pub cantiere: Option<String>,
    pub macchina: Option<String>,
    pub linea: Option<String>,
    pub ore: Option<f64>,
    #[serde(alias = "data")]
    pub data_dmy: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub break_minutes: Option<i64>,
    pub transfer_minutes: Option<i64>,
    pub descrizione: Option<String>,
    pub location: Option<String>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
}
