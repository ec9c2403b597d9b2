use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_ADMIN_USER: &str = "admin";
const DEFAULT_ADMIN_PASS: &str = "GTSTrack";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub app_env: String,
    pub admin_user: String,
    pub admin_pass: String,
    pub public_dir: String,
    pub options_seed_path: String,
    pub legacy_entries_path: Option<String>,
    pub geo_lookup_timeout: Duration,
    /// Servizi di geolocalizzazione IP, provati in ordine. `{ip}` viene sostituito.
    pub ip_lookup_urls: Vec<String>,
    pub geocode_url: String,
    pub geocode_min_interval: Duration,
    pub geocode_user_agent: String,
    pub export_reverse_geocode: bool,
    pub user_session_ttl: Duration,
    /// Costo bcrypt per le password degli operatori
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://data/timesheet.db?mode=rwc".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            max_connections: 10,
            app_env: "development".to_string(),
            admin_user: DEFAULT_ADMIN_USER.to_string(),
            admin_pass: DEFAULT_ADMIN_PASS.to_string(),
            public_dir: "public".to_string(),
            options_seed_path: "data/operators.json".to_string(),
            legacy_entries_path: None,
            geo_lookup_timeout: Duration::from_millis(2500),
            ip_lookup_urls: vec![
                "https://ipapi.co/{ip}/json/".to_string(),
                "https://ipwho.is/{ip}".to_string(),
            ],
            geocode_url: "https://nominatim.openstreetmap.org/reverse".to_string(),
            geocode_min_interval: Duration::from_millis(1100),
            geocode_user_agent: "timesheet-server/0.1".to_string(),
            export_reverse_geocode: true,
            user_session_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();
        let defaults = Config::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);

        let admin_user = env::var("ADMIN_USER").unwrap_or(defaults.admin_user);
        let admin_pass = env::var("ADMIN_PASS").unwrap_or_else(|_| {
            warn!("ADMIN_PASS not set, using default (not secure for production!)");
            defaults.admin_pass
        });

        let ip_lookup_urls = match env::var("GEO_IP_LOOKUP_URLS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.ip_lookup_urls,
        };

        let export_reverse_geocode = match env::var("EXPORT_REVERSE_GEOCODE") {
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| "Invalid EXPORT_REVERSE_GEOCODE: must be true or false".to_string())?,
            Err(_) => defaults.export_reverse_geocode,
        };

        Ok(Config {
            database_url,
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT", defaults.server_port)
                .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?,
            max_connections: parse_var("MAX_DB_CONNECTIONS", defaults.max_connections)
                .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?,
            app_env: env::var("APP_ENV").unwrap_or(defaults.app_env),
            admin_user,
            admin_pass,
            public_dir: env::var("PUBLIC_DIR").unwrap_or(defaults.public_dir),
            options_seed_path: env::var("OPTIONS_SEED_PATH").unwrap_or(defaults.options_seed_path),
            legacy_entries_path: env::var("LEGACY_ENTRIES_PATH").ok().filter(|p| !p.is_empty()),
            geo_lookup_timeout: Duration::from_millis(
                parse_var("GEO_LOOKUP_TIMEOUT_MS", 2500u64)
                    .map_err(|_| "Invalid GEO_LOOKUP_TIMEOUT_MS: must be a positive number".to_string())?,
            ),
            ip_lookup_urls,
            geocode_url: env::var("GEOCODE_URL").unwrap_or(defaults.geocode_url),
            geocode_min_interval: Duration::from_millis(
                parse_var("GEOCODE_MIN_INTERVAL_MS", 1100u64)
                    .map_err(|_| "Invalid GEOCODE_MIN_INTERVAL_MS: must be a positive number".to_string())?,
            ),
            geocode_user_agent: env::var("GEOCODE_USER_AGENT").unwrap_or(defaults.geocode_user_agent),
            export_reverse_geocode,
            user_session_ttl: Duration::from_secs(
                parse_var("USER_SESSION_TTL_SECS", defaults.user_session_ttl.as_secs())
                    .map_err(|_| "Invalid USER_SESSION_TTL_SECS: must be a positive number".to_string())?,
            ),
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost)
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or_else(|| "Invalid BCRYPT_COST: must be between 4 and 31".to_string())?,
        })
    }

    /// Stampa la configurazione (nascondendo i segreti)
    pub fn print_info(&self) {
        info!("Server configuration:");
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}:{}", self.server_host, self.server_port);
        info!("   Database: {}", Self::mask_url(&self.database_url));
        info!("   Max DB Connections: {}", self.max_connections);
        info!("   Static files: {}", self.public_dir);
        info!("   IP lookup services: {}", self.ip_lookup_urls.len());
        info!(
            "   Reverse geocoding on export: {} (min interval {}ms)",
            self.export_reverse_geocode,
            self.geocode_min_interval.as_millis()
        );
        info!(
            "   Admin credentials: {}",
            if self.admin_pass == DEFAULT_ADMIN_PASS {
                "USING DEFAULT (INSECURE!)"
            } else {
                "custom password configured"
            }
        );
    }

    /// Maschera le credenziali nell'URL del database per il logging
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        if url.starts_with("sqlite:") {
            // nessuna credenziale da nascondere
            return url.to_string();
        }
        "***".to_string()
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, T::Err> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>(),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_url_hides_credentials() {
        assert_eq!(
            Config::mask_url("postgres://user:secret@db:5432/app"),
            "postgres://***@db:5432/app"
        );
        assert_eq!(
            Config::mask_url("sqlite://data/timesheet.db?mode=rwc"),
            "sqlite://data/timesheet.db?mode=rwc"
        );
        assert_eq!(Config::mask_url("garbage"), "***");
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
