//! Funzioni di supporto senza stato: date, orari, normalizzazione testi.

pub mod date;
pub mod text;
