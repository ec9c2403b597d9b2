//! Reverse geocoding: coordinate "lat,lon" -> nome del luogo

use super::GeoError;
use super::rate_limit::{Clock, RateGate, TokioClock};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument, warn};

lazy_static! {
    // solo "lat,lon", con l'eventuale suffisso di accuratezza del browser: "45.46,9.19 (±12m)"
    static ref COORDINATES: Regex = Regex::new(
        r"^\s*(-?[0-9]{1,3}(?:\.[0-9]+)?)\s*,\s*(-?[0-9]{1,3}(?:\.[0-9]+)?)\s*(?:\(\s*±?\s*[0-9]+(?:\.[0-9]+)?\s*m\s*\))?\s*$"
    )
    .unwrap();
}

/// Estrae latitudine e longitudine da una stringa di posizione, se ne contiene
pub fn parse_coordinates(raw: &str) -> Option<(f64, f64)> {
    let caps = COORDINATES.captures(raw)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lon: f64 = caps[2].parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some((lat, lon))
}

/// Chiave di cache: coordinate arrotondate a 6 decimali
pub fn coordinate_key(lat: f64, lon: f64) -> String {
    format!("{:.6},{:.6}", lat, lon)
}

pub trait GeocodeBackend: Send + Sync {
    fn reverse(&self, lat: f64, lon: f64) -> impl Future<Output = Result<String, GeoError>> + Send;
}

pub struct NominatimClient {
    http: reqwest::Client,
    url: String,
    user_agent: String,
    timeout: Duration,
}

impl NominatimClient {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct NominatimPlace {
    display_name: Option<String>,
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    pedestrian: Option<String>,
    cycleway: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
}

impl NominatimPlace {
    /// `display_name` se presente, altrimenti via, città, CAP e paese
    fn label(self) -> Option<String> {
        if let Some(name) = self.display_name.filter(|n| !n.trim().is_empty()) {
            return Some(name);
        }
        let a = self.address;
        let parts: Vec<String> = [
            a.road.or(a.pedestrian).or(a.cycleway),
            a.city.or(a.town).or(a.village).or(a.municipality),
            a.postcode,
            a.country,
        ]
        .into_iter()
        .flatten()
        .filter(|p| !p.trim().is_empty())
        .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

impl GeocodeBackend for NominatimClient {
    #[instrument(skip(self))]
    async fn reverse(&self, lat: f64, lon: f64) -> Result<String, GeoError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeoError::Status(response.status().as_u16()));
        }
        let place: NominatimPlace = response.json().await?;
        place.label().ok_or(GeoError::Empty)
    }
}

/// Reverse geocoder condiviso dal processo: ogni chiamata passa dal gate
pub struct ReverseGeocoder<B: GeocodeBackend, C: Clock = TokioClock> {
    backend: B,
    gate: RateGate<C>,
}

impl<B: GeocodeBackend, C: Clock> ReverseGeocoder<B, C> {
    pub fn new(backend: B, gate: RateGate<C>) -> Self {
        Self { backend, gate }
    }

    /// Nome del luogo, `None` su qualsiasi errore
    pub async fn lookup(&self, lat: f64, lon: f64) -> Option<String> {
        self.gate.acquire().await;
        match self.backend.reverse(lat, lon).await {
            Ok(place) => Some(place),
            Err(e) => {
                warn!("Reverse geocoding of {},{} failed: {}", lat, lon, e);
                None
            }
        }
    }

    /// Nuova cache per un singolo export
    pub fn batch(&self) -> GeocodeBatch<'_, B, C> {
        GeocodeBatch {
            geocoder: self,
            cache: HashMap::new(),
        }
    }
}

/// Cache per coordinate arrotondate, valida per la durata di un batch.
/// Anche i fallimenti vengono memorizzati, così un punto irraggiungibile costa una sola chiamata.
pub struct GeocodeBatch<'a, B: GeocodeBackend, C: Clock> {
    geocoder: &'a ReverseGeocoder<B, C>,
    cache: HashMap<String, Option<String>>,
}

impl<B: GeocodeBackend, C: Clock> GeocodeBatch<'_, B, C> {
    /// Sostituisce le coordinate con il nome del luogo; ogni altro valore torna invariato
    pub async fn resolve(&mut self, raw: &str) -> String {
        let Some((lat, lon)) = parse_coordinates(raw) else {
            return raw.to_string();
        };
        let key = coordinate_key(lat, lon);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Geocode cache hit for {}", key);
            return cached.clone().unwrap_or_else(|| raw.to_string());
        }
        let place = self.geocoder.lookup(lat, lon).await;
        self.cache.insert(key, place.clone());
        place.unwrap_or_else(|| raw.to_string())
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
