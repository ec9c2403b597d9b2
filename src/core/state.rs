//! Application State - Stato globale dell'applicazione
//!
//! Contiene repository, servizi, sessioni in memoria e i client verso i
//! servizi di geolocalizzazione, condivisi da tutte le route e i middleware.

use crate::core::{Config, SessionStore};
use crate::geo::{LocationResolver, NominatimClient, RateGate, ReverseGeocoder};
use crate::repositories::{EntryRepository, OptionRepository, UserRepository};
use crate::shift::ShiftService;
use sqlx::SqlitePool;

pub struct AppState {
    /// Repository delle voci di lavoro
    pub entry: EntryRepository,

    /// Repository delle liste controllate (operatori, cantieri, macchine, linee)
    pub option: OptionRepository,

    /// Repository degli account operatore
    pub user: UserRepository,

    /// Ciclo di vita dei turni
    pub shifts: ShiftService,

    /// Token admin e token utente, validi per la vita del processo
    pub sessions: SessionStore,

    /// Posizione esplicita o stimata dall'IP
    pub locations: LocationResolver,

    /// Reverse geocoding limitato a una richiesta ogni `geocode_min_interval`
    pub geocoder: ReverseGeocoder<NominatimClient>,

    pub config: Config,
}

impl AppState {
    /// Crea lo stato a partire dal pool condiviso e dalla configurazione
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let entry = EntryRepository::new(pool.clone());
        let backend = NominatimClient::new(
            config.geocode_url.clone(),
            config.geocode_user_agent.clone(),
            config.geo_lookup_timeout,
        );
        Self {
            shifts: ShiftService::new(entry.clone()),
            entry,
            option: OptionRepository::new(pool.clone()),
            user: UserRepository::new(pool),
            sessions: SessionStore::new(config.user_session_ttl),
            locations: LocationResolver::new(config.ip_lookup_urls.clone(), config.geo_lookup_timeout),
            geocoder: ReverseGeocoder::new(backend, RateGate::new(config.geocode_min_interval)),
            config,
        }
    }
}
