//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod export;
pub mod geo;
pub mod repositories;
pub mod seed;
pub mod services;
pub mod shift;
pub mod utils;

// Re-export dei tipi principali per facilitare l'import
pub use core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{delete, get, post},
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    let public_dir = state.config.public_dir.clone();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(root))
        .nest("/api", configure_api_routes(state.clone()))
        .merge(configure_page_routes(state.clone(), &public_dir))
        .fallback_service(ServeDir::new(public_dir))
        .layer(cors)
        .with_state(state)
}

fn configure_api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(configure_public_routes())
        .merge(configure_user_routes(state.clone()))
        .merge(configure_admin_routes(state))
}

/// Login, registrazione e liste per il modulo: nessuna sessione richiesta
fn configure_public_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/login", post(admin_login))
        .route("/register", post(register_user))
        .route("/login-user", post(login_user))
        .route("/reset-password", post(reset_password))
        .route("/logout-user", post(logout_user))
        .route("/options", get(list_options))
        .route("/operators", get(list_operators))
}

/// Rotte del modulo operatore (sessione utente via bearer o cookie)
fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::user_middleware;
    use services::*;

    Router::new()
        .route("/entry/start", post(start_shift))
        .route("/entry/status", get(shift_status))
        .route("/entry/finish", post(finish_shift))
        .route("/entry", post(create_entry))
        .route("/geolocation", get(geolocation))
        .route("/user/profile", get(user_profile))
        .route_layer(middleware::from_fn_with_state(state, user_middleware))
}

/// Rotte del pannello admin (bearer token admin)
fn configure_admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::admin_middleware;
    use services::*;

    Router::new()
        .route("/entries/search", post(search_entries))
        .route("/entries/delete-bulk", post(delete_entries_bulk))
        .route("/entries/{entry_id}", delete(delete_entry))
        .route("/export/csv", post(export_csv))
        .route("/export/xlsx", post(export_xlsx))
        .route("/options", post(add_option).delete(remove_option))
        .route_layer(middleware::from_fn_with_state(state, admin_middleware))
}

/// Il modulo principale è servito solo a utenti autenticati
fn configure_page_routes(state: Arc<AppState>, public_dir: &str) -> Router<Arc<AppState>> {
    use core::user_middleware;

    let index = Path::new(public_dir).join("index.html");
    Router::new()
        .route_service("/", ServeFile::new(&index))
        .route_service("/index.html", ServeFile::new(&index))
        .route_layer(middleware::from_fn_with_state(state, user_middleware))
}
