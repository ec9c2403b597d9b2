//! Auth services - Login admin, registrazione e sessioni degli operatori

use crate::core::auth::{clear_session_cookie, session_cookie, user_token};
use crate::core::{AppError, AppState};
use crate::dtos::{
    AdminLoginDTO, CreateUserDTO, LoginUserDTO, RegisterDTO, ResetPasswordDTO, UserProfileDTO,
};
use crate::entities::{OptionCategory, User};
use crate::repositories::Create;
use crate::utils::text::{collapse_whitespace, login_key_from_email, login_key_from_name};
use axum::{
    Extension,
    extract::{Json, State},
    http::{HeaderMap, header},
    response::IntoResponse,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, body))]
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AdminLoginDTO>,
) -> Result<Json<Value>, AppError> {
    if body.user != state.config.admin_user || body.pass != state.config.admin_pass {
        warn!("Admin login rejected");
        return Err(AppError::unauthorized("Credenziali non valide"));
    }
    let token = state.sessions.issue_admin_token();
    Ok(Json(json!({ "token": token })))
}

/// Nome e cognome ripuliti; entrambi obbligatori
fn clean_name(body: &RegisterDTO) -> Result<(String, String), AppError> {
    body.validate()?;
    let first_name = collapse_whitespace(&body.first_name);
    let last_name = collapse_whitespace(&body.last_name);
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::bad_request("Dati non validi"));
    }
    Ok((first_name, last_name))
}

fn hash_password(state: &AppState, password: &str) -> Result<String, AppError> {
    User::hash_password(password, state.config.bcrypt_cost).map_err(|e| {
        error!("Failed to hash password: {}", e);
        AppError::internal_server_error("Errore interno del server")
    })
}

#[instrument(skip(state, body))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterDTO>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Validare nome, cognome e lunghezza della password
    // 2. Il nome deve corrispondere a un operatore esistente ("nome cognome" o "cognome nome")
    // 3. Rifiutare una chiave di login o un operatore già registrati
    // 4. Salvare l'utente con la password hashata e aprire la sessione
    let (first_name, last_name) = clean_name(&body)?;

    let direct = login_key_from_name(&first_name, &last_name);
    let reversed = login_key_from_name(&last_name, &first_name);
    let operator_name = state
        .option
        .values(OptionCategory::Operators)
        .await?
        .into_iter()
        .find(|op| {
            let key = collapse_whitespace(op).to_lowercase();
            key == direct || key == reversed
        })
        .map(|op| collapse_whitespace(&op).to_uppercase())
        .ok_or_else(|| {
            warn!("Registration for unknown operator {:?}", direct);
            AppError::bad_request("Nome non presente nell'elenco operatori.")
        })?;

    if state.user.find_by_login_key(&direct).await?.is_some()
        || state.user.find_by_operator_name(&operator_name).await?.is_some()
    {
        warn!("Operator {} already registered", operator_name);
        return Err(AppError::conflict("Utente già registrato"));
    }

    let new_user = CreateUserDTO {
        login_key: direct,
        password_hash: hash_password(&state, &body.password)?,
        first_name,
        last_name,
        operator_name,
    };
    let user = match state.user.create(&new_user).await {
        Ok(user) => user,
        // registrazione concorrente per lo stesso operatore
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(AppError::conflict("Utente già registrato"));
        }
        Err(e) => return Err(e.into()),
    };
    info!("User {} registered as operator {}", user.id, user.operator_name);

    let token = state.sessions.issue_user_token(&user.id);
    let cookie = session_cookie(&token, state.sessions.user_ttl());
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "ok": true, "user": UserProfileDTO::from(user) })),
    ))
}

#[instrument(skip(state, body))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginUserDTO>,
) -> Result<impl IntoResponse, AppError> {
    let login_key = match (&body.first_name, &body.last_name, &body.email) {
        (Some(first), Some(last), _) if !first.trim().is_empty() && !last.trim().is_empty() => {
            login_key_from_name(first, last)
        }
        (_, _, Some(email)) if !email.trim().is_empty() => login_key_from_email(email),
        _ => return Err(AppError::bad_request("Dati non validi")),
    };
    if body.password.is_empty() {
        return Err(AppError::bad_request("Dati non validi"));
    }

    let user = match state.user.find_by_login_key(&login_key).await? {
        Some(user) if user.verify_password(&body.password) => user,
        _ => {
            warn!("Login failed for {:?}", login_key);
            return Err(AppError::unauthorized("Credenziali non valide"));
        }
    };

    let token = state.sessions.issue_user_token(&user.id);
    info!("User {} logged in", user.id);
    Ok((
        [(header::SET_COOKIE, session_cookie(&token, state.sessions.user_ttl()))],
        Json(json!({ "ok": true, "user": UserProfileDTO::from(user) })),
    ))
}

/// Nuova password per un utente esistente; le sessioni precedenti vengono revocate
#[instrument(skip(state, body))]
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetPasswordDTO>,
) -> Result<impl IntoResponse, AppError> {
    let (first_name, last_name) = clean_name(&body)?;
    let login_key = login_key_from_name(&first_name, &last_name);

    let user = state
        .user
        .find_by_login_key(&login_key)
        .await?
        .ok_or_else(|| AppError::not_found("Utente non trovato"))?;

    let password_hash = hash_password(&state, &body.password)?;
    let user = state
        .user
        .update_password(&user.id, &password_hash)
        .await?
        .ok_or_else(|| AppError::not_found("Utente non trovato"))?;

    state.sessions.revoke_user_sessions(&user.id);
    let token = state.sessions.issue_user_token(&user.id);
    info!("Password reset for user {}", user.id);
    Ok((
        [(header::SET_COOKIE, session_cookie(&token, state.sessions.user_ttl()))],
        Json(json!({ "ok": true })),
    ))
}

#[instrument(skip(state, headers))]
pub async fn logout_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = user_token(&state, &headers) {
        state.sessions.revoke_user_token(&token);
        debug!("User session revoked");
    }
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "ok": true })),
    )
}

#[instrument(skip(current_user), fields(user_id = %current_user.id))]
pub async fn user_profile(Extension(current_user): Extension<User>) -> Json<Value> {
    Json(json!({ "user": UserProfileDTO::from(current_user) }))
}
