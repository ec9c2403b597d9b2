//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Ogni sotto-modulo gestisce gli endpoint HTTP di una specifica funzionalità.

pub mod auth;
pub mod entry;
pub mod export;
pub mod geo;
pub mod options;

// Re-exports per facilitare l'import
pub use auth::{admin_login, login_user, logout_user, register_user, reset_password, user_profile};
pub use entry::{
    create_entry, delete_entries_bulk, delete_entry, finish_shift, search_entries, shift_status,
    start_shift,
};
pub use export::{export_csv, export_xlsx};
pub use geo::geolocation;
pub use options::{add_option, list_operators, list_options, remove_option};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
