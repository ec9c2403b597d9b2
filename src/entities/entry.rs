//! Entry entity - Voce di lavoro (turno aperto o chiuso)

use crate::utils::text::operator_key;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Una voce è "aperta" finché `end_time` è nullo; `ore` vale 0 fino alla chiusura.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow)]
pub struct Entry {
    pub id: i64,
    pub operator: String,
    pub cantiere: String,
    pub macchina: String,
    pub linea: String,
    pub ore: f64,
    /// stessa data di `work_date`, in formato DD/MM/YYYY
    pub data_dmy: String,
    pub work_date: NaiveDate,
    pub descrizione: String,
    pub location: Option<String>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub break_minutes: Option<i64>,
    pub transfer_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn belongs_to(&self, operator: &str) -> bool {
        operator_key(&self.operator) == operator_key(operator)
    }
}
