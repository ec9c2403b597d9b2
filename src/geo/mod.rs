//! Location resolution - posizione leggibile con fallback su più sorgenti
//!
//! Ordine: posizione esplicita del client (geolocalizzazione del browser o testo libero),
//! poi geolocalizzazione IP tramite servizi esterni, altrimenti nulla.
//! Il reverse geocoding (coordinate -> luogo) passa da un gate a intervallo fisso
//! condiviso da tutto il processo. Nessun errore di rete risale al chiamante.

pub mod ip;
pub mod rate_limit;
pub mod resolver;
pub mod reverse;

pub use ip::{UNKNOWN_IP, client_ip};
pub use rate_limit::{Clock, RateGate, TokioClock};
pub use resolver::LocationResolver;
pub use reverse::{GeocodeBackend, GeocodeBatch, NominatimClient, ReverseGeocoder};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("lookup returned no usable place")]
    Empty,
}
