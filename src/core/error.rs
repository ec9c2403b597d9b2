use crate::export::ExportError;
use crate::shift::ShiftError;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    details: Option<String>,
    extra: Map<String, Value>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            details: None,
            extra: Map::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Aggiunge un campo al corpo JSON dell'errore (es. la voce aperta in conflitto)
    pub fn with_field(mut self, key: &str, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), value);
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    // Common error constructors
    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: &'static str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Risorsa non trovata"),

            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Self::conflict("Valore già presente")
            }

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                error!("Database pool unavailable: {}", err);
                Self::service_unavailable("Database non disponibile")
            }

            _ => {
                // il dettaglio resta nei log, mai nella risposta
                error!("Database error: {}", err);
                Self::internal_server_error("Errore interno del server")
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::bad_request("Dati non validi").with_details(err.to_string())
    }
}

impl From<ShiftError> for AppError {
    fn from(err: ShiftError) -> Self {
        match err {
            ShiftError::Conflict(open) => {
                Self::conflict("Esiste già un turno aperto per questo operatore.").with_field("entry", open)
            }
            ShiftError::NotFound => Self::not_found("Voce non trovata."),
            ShiftError::NotOwner => Self::forbidden("Non puoi modificare turni di altri operatori."),
            ShiftError::InvalidState(message) | ShiftError::InvalidInput(message) => {
                Self::bad_request(message)
            }
            ShiftError::Database(e) => e.into(),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        error!("Export failed: {}", err);
        Self::internal_server_error("Errore durante l'esportazione")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorResponse {
            error: self.message,
            details: self.details,
            extra: self.extra,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_fields_are_flattened_into_body() {
        let err = AppError::conflict("Turno già aperto").with_field("entry", json!({"id": 7}));
        let body = serde_json::to_value(ErrorResponse {
            error: err.message,
            details: err.details.clone(),
            extra: err.extra.clone(),
        })
        .unwrap();
        assert_eq!(body, json!({"error": "Turno già aperto", "entry": {"id": 7}}));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn shift_errors_follow_http_taxonomy() {
        assert_eq!(AppError::from(ShiftError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::from(ShiftError::NotOwner).status(), StatusCode::FORBIDDEN);
        let invalid = AppError::from(ShiftError::InvalidInput("Orario di fine non valido (usa HH:MM)."));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message(), "Orario di fine non valido (usa HH:MM).");
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
