//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella nel database.

pub mod entry;
pub mod enums;
pub mod user;

// Re-exports per facilitare l'import
pub use entry::Entry;
pub use enums::OptionCategory;
pub use user::User;
