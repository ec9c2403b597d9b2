//! LocationResolver - posizione esplicita del client, poi geolocalizzazione IP

use super::GeoError;
use super::ip::UNKNOWN_IP;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub struct LocationResolver {
    http: reqwest::Client,
    lookup_urls: Vec<String>,
    timeout: Duration,
}

impl LocationResolver {
    /// `lookup_urls` contengono il segnaposto `{ip}` e vengono provati in ordine
    pub fn new(lookup_urls: Vec<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            lookup_urls,
            timeout,
        }
    }

    /// Posizione esplicita se presente, altrimenti quella stimata dall'IP. Mai un errore.
    pub async fn resolve(&self, explicit: Option<&str>, client_ip: &str) -> Option<String> {
        if let Some(location) = explicit.map(str::trim).filter(|l| !l.is_empty()) {
            return Some(location.to_string());
        }
        self.lookup_ip(client_ip).await
    }

    #[instrument(skip(self))]
    pub async fn lookup_ip(&self, client_ip: &str) -> Option<String> {
        if client_ip == UNKNOWN_IP || client_ip.is_empty() {
            debug!("No public client IP, skipping lookup");
            return None;
        }
        for template in &self.lookup_urls {
            match self.lookup_one(template, client_ip).await {
                Ok(place) => return Some(place),
                Err(e) => warn!("IP lookup via {} failed: {}", template, e),
            }
        }
        None
    }

    async fn lookup_one(&self, template: &str, client_ip: &str) -> Result<String, GeoError> {
        let url = template.replace("{ip}", client_ip);
        let response = self.http.get(&url).timeout(self.timeout).send().await?;
        if !response.status().is_success() {
            return Err(GeoError::Status(response.status().as_u16()));
        }
        let body: Value = response.json().await?;
        place_from_lookup(&body).ok_or(GeoError::Empty)
    }
}

/// "città, regione, paese" da una risposta di geolocalizzazione IP.
/// `None` se il servizio segnala un errore o non restituisce nulla di utile.
fn place_from_lookup(body: &Value) -> Option<String> {
    if body.get("success").and_then(Value::as_bool) == Some(false)
        || body.get("error").and_then(Value::as_bool) == Some(true)
    {
        return None;
    }
    let field = |key: &str| {
        body.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    let parts: Vec<&str> = [
        field("city"),
        field("region"),
        field("country_name").or_else(|| field("country")),
    ]
    .into_iter()
    .flatten()
    .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}
