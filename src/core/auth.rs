//! Middleware di autenticazione: bearer admin e sessione operatore (bearer o cookie)

use crate::core::{AppError, AppState};
use crate::entities::User;
use crate::repositories::Read;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Redirect};
use axum::{body::Body, extract::Request, http::Response, middleware::Next};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const USER_COOKIE: &str = "userToken";
const REGISTER_PAGE: &str = "/register.html";

/// Token da `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}

/// Valore di un cookie dall'header `Cookie`
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Token utente: prima il bearer, poi il cookie; solo se corrisponde a una sessione valida
pub fn user_token(state: &AppState, headers: &HeaderMap) -> Option<String> {
    [bearer_token(headers), cookie_value(headers, USER_COOKIE)]
        .into_iter()
        .flatten()
        .find(|token| state.sessions.user_session(token).is_some())
        .map(str::to_string)
}

pub fn session_cookie(token: &str, max_age: Duration) -> String {
    format!(
        "{USER_COOKIE}={token}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        max_age.as_secs()
    )
}

pub fn clear_session_cookie() -> String {
    format!("{USER_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax")
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

#[instrument(skip(state, req, next))]
pub async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running admin middleware");
    match bearer_token(req.headers()) {
        Some(token) if state.sessions.is_admin_token(token) => Ok(next.run(req).await),
        _ => {
            warn!("Missing or unknown admin token");
            Err(AppError::unauthorized("Unauthorized"))
        }
    }
}

/// Richiede una sessione operatore valida e inserisce lo `User` nelle extension.
/// Le navigazioni del browser vengono rimandate alla pagina di registrazione.
#[instrument(skip(state, req, next))]
pub async fn user_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running user middleware");
    let session = user_token(&state, req.headers()).and_then(|t| state.sessions.user_session(&t));

    let current_user = match session {
        Some(session) => state.user.read(&session.user_id).await?,
        None => None,
    };

    match current_user {
        Some(user) => {
            debug!("User authenticated: {}", user.login_key);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        None if wants_html(req.headers()) => {
            info!("Unauthenticated browser navigation, redirecting to {}", REGISTER_PAGE);
            Ok(Redirect::to(REGISTER_PAGE).into_response())
        }
        None => {
            warn!("Missing or expired user session");
            Err(AppError::unauthorized("Utente non autenticato"))
        }
    }
}

/// Verifica che l'utente corrente possa agire per conto dell'operatore indicato
pub fn require_operator(user: &User, operator: &str) -> Result<(), AppError> {
    if user.may_act_as(operator) {
        return Ok(());
    }
    warn!(
        "User {} tried to act as operator {:?}",
        user.login_key, operator
    );
    Err(AppError::forbidden("Non puoi operare per un altro operatore."))
}
