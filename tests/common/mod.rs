#![allow(dead_code)]

use axum_test::TestServer;
use axum_test::http::HeaderName;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::sync::Arc;
use timesheet_server::config::Config;
use timesheet_server::core::AppState;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "test-admin-pass";
pub const PASSWORD: &str = "segreto123";

/// Configurazione di test: nessuna chiamata di rete, bcrypt al costo minimo
pub fn test_config() -> Config {
    Config {
        admin_user: ADMIN_USER.to_string(),
        admin_pass: ADMIN_PASS.to_string(),
        ip_lookup_urls: Vec::new(),
        export_reverse_geocode: false,
        bcrypt_cost: 4,
        ..Config::default()
    }
}

/// Crea un AppState per i test
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool, test_config()))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = timesheet_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

pub fn authorization() -> HeaderName {
    HeaderName::from_static("authorization")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Login admin, restituisce il bearer token
pub async fn admin_token(server: &TestServer) -> String {
    let response = server
        .post("/api/login")
        .json(&json!({ "user": ADMIN_USER, "pass": ADMIN_PASS }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["token"].as_str().expect("token in response").to_string()
}

/// Token della sessione utente letto dall'header Set-Cookie
pub fn session_token_from(response: &axum_test::TestResponse) -> String {
    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("Set-Cookie header should be present")
        .to_str()
        .expect("ascii cookie")
        .to_string();
    cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("userToken="))
        .expect("userToken cookie")
        .to_string()
}

/// Registra un operatore presente nelle opzioni e restituisce il token di sessione
pub async fn register_operator(server: &TestServer, first_name: &str, last_name: &str) -> String {
    let response = server
        .post("/api/register")
        .json(&json!({
            "firstName": first_name,
            "lastName": last_name,
            "password": PASSWORD,
        }))
        .await;
    response.assert_status_ok();
    session_token_from(&response)
}

/// Scrive un file JSON temporaneo con nome univoco e ne restituisce il percorso
pub fn write_temp_json(contents: &Value) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("timesheet-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents.to_string()).expect("temp file should be writable");
    path
}
