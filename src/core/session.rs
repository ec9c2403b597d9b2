//! Session store - Token opachi in memoria per admin e operatori
//!
//! I token vivono solo per la durata del processo: un riavvio invalida tutte le sessioni.
//! Le sessioni utente scadono dopo il TTL configurato (lo stesso Max-Age del cookie),
//! le sessioni admin non scadono.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Sessione di un operatore autenticato
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user_id: String,
    pub issued_at: Instant,
}

pub struct SessionStore {
    admin_tokens: DashMap<String, Instant>,
    user_tokens: DashMap<String, UserSession>,
    user_ttl: Duration,
}

impl SessionStore {
    pub fn new(user_ttl: Duration) -> Self {
        Self {
            admin_tokens: DashMap::new(),
            user_tokens: DashMap::new(),
            user_ttl,
        }
    }

    pub fn user_ttl(&self) -> Duration {
        self.user_ttl
    }

    #[instrument(skip(self))]
    pub fn issue_admin_token(&self) -> String {
        let token = new_token();
        self.admin_tokens.insert(token.clone(), Instant::now());
        info!("Admin session issued, {} active", self.admin_tokens.len());
        token
    }

    pub fn is_admin_token(&self, token: &str) -> bool {
        self.admin_tokens.contains_key(token)
    }

    #[instrument(skip(self))]
    pub fn issue_user_token(&self, user_id: &str) -> String {
        let token = new_token();
        self.user_tokens.insert(
            token.clone(),
            UserSession {
                user_id: user_id.to_string(),
                issued_at: Instant::now(),
            },
        );
        info!("User session issued");
        token
    }

    /// Restituisce la sessione se il token esiste e non è scaduto.
    /// I token scaduti vengono rimossi al primo accesso.
    pub fn user_session(&self, token: &str) -> Option<UserSession> {
        let session = self.user_tokens.get(token).map(|s| s.value().clone())?;
        if session.issued_at.elapsed() >= self.user_ttl {
            debug!("User session expired, purging token");
            self.user_tokens.remove(token);
            return None;
        }
        Some(session)
    }

    pub fn revoke_user_token(&self, token: &str) -> bool {
        self.user_tokens.remove(token).is_some()
    }

    /// Revoca tutte le sessioni di un utente (es. dopo il reset della password)
    pub fn revoke_user_sessions(&self, user_id: &str) {
        self.user_tokens.retain(|_, s| s.user_id != user_id);
    }

    pub fn active_user_sessions(&self) -> usize {
        self.user_tokens.len()
    }
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}
