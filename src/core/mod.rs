//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! - Autenticazione (admin e operatori)
//! - Configurazione
//! - Gestione errori
//! - Sessioni in memoria
//! - Stato applicazione

pub mod auth;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::{admin_middleware, require_operator, user_middleware};
pub use config::Config;
pub use error::AppError;
pub use session::SessionStore;
pub use state::AppState;
