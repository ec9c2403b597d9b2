//! Shift lifecycle - apertura e chiusura dei turni e calcolo delle ore lavorate

pub mod calc;
pub mod service;

pub use calc::{WorkedTime, compute_worked_time};
pub use service::{FinishOutcome, ShiftService};
pub(crate) use service::parse_ore;

use crate::entities::Entry;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShiftError {
    /// esiste già un turno aperto per l'operatore
    #[error("open shift already exists (entry {})", .0.id)]
    Conflict(Box<Entry>),
    #[error("entry not found")]
    NotFound,
    #[error("entry belongs to another operator")]
    NotOwner,
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
