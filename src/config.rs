//! Runtime configuration.
//!
//! An [`AppConfig`] is built once per process and handed to the provider clients
//! at construction. Layers, later wins:
//!
//! 1. built-in defaults
//! 2. optional TOML file (`--config`)
//! 3. environment (`.env` is loaded first via dotenvy)
//! 4. CLI flags (applied in `app`)

use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{
    default_cutoff, NullTonnage, DEFAULT_SERIES_ID, DEFAULT_WASTE_LIMIT, DEFAULT_WASTE_URL,
};
use crate::error::{AppError, FetchError};

pub const DEFAULT_FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred";

const ENV_API_KEY: &str = "FRED_API_KEY";
const ENV_WASTE_URL: &str = "TRASH_WASTE_URL";
const ENV_INSECURE_TLS: &str = "TRASH_INSECURE_TLS";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// FRED API key. `None` makes the index fetch fail with a diagnostic.
    pub fred_api_key: Option<String>,
    pub fred_base_url: String,
    pub series_id: String,
    pub waste_url: String,
    /// Sent as `$limit`; older records beyond it are silently truncated by the portal.
    pub waste_limit: usize,
    /// Keep entries strictly after this date.
    pub cutoff: NaiveDate,
    pub null_tonnage: NullTonnage,
    /// Skip TLS certificate verification. Opt-in only.
    pub accept_invalid_certs: bool,
    /// Per-request timeout; `0` disables it.
    pub timeout_secs: u64,
    /// Fetch cache time-to-live; `0` keeps entries until cleared.
    pub cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fred_api_key: None,
            fred_base_url: DEFAULT_FRED_BASE_URL.to_string(),
            series_id: DEFAULT_SERIES_ID.to_string(),
            waste_url: DEFAULT_WASTE_URL.to_string(),
            waste_limit: DEFAULT_WASTE_LIMIT,
            cutoff: default_cutoff(),
            null_tonnage: NullTonnage::Fail,
            accept_invalid_certs: false,
            timeout_secs: 30,
            cache_ttl_secs: 3600,
        }
    }
}

impl AppConfig {
    /// Defaults, then the optional TOML file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        dotenvy::dotenv().ok();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::new(2, format!("Failed to read config '{}': {e}", path.display())))?;
        Self::from_toml(&raw)
            .map_err(|e| AppError::new(2, format!("Invalid config '{}': {e}", path.display())))
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Overlay environment variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.fred_api_key = Some(key.trim().to_string());
        }
        if let Some(url) = lookup(ENV_WASTE_URL).filter(|u| !u.trim().is_empty()) {
            self.waste_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_INSECURE_TLS) {
            self.accept_invalid_certs = parse_flag(&raw).ok_or_else(|| {
                AppError::new(2, format!("{ENV_INSECURE_TLS} must be a boolean, got '{raw}'."))
            })?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }

    /// Build the blocking HTTP client shared by both provider clients.
    pub fn http_client(&self) -> Result<Client, FetchError> {
        let mut builder = Client::builder()
            .user_agent(concat!("trash-index/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout());
        if self.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        Ok(builder.build()?)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_dashboard_sources() {
        let config = AppConfig::default();
        assert_eq!(config.series_id, "PCU322211322211P");
        assert_eq!(config.waste_limit, 5000);
        assert_eq!(config.cutoff, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.fred_api_key, None);
    }

    #[test]
    fn toml_overrides_only_given_fields() {
        let config = AppConfig::from_toml(
            r#"
            series_id = "PPIACO"
            cutoff = "2021-06-01"
            null_tonnage = "zero"
            cache_ttl_secs = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.series_id, "PPIACO");
        assert_eq!(config.cutoff, NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());
        assert_eq!(config.null_tonnage, NullTonnage::Zero);
        assert_eq!(config.cache_ttl(), None);
        assert_eq!(config.waste_url, DEFAULT_WASTE_URL);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        assert!(AppConfig::from_toml("api_key = \"x\"").is_err());
    }

    #[test]
    fn env_layer_sets_key_and_tls_opt_in() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FRED_API_KEY", " abc123 "),
            ("TRASH_INSECURE_TLS", "yes"),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.fred_api_key.as_deref(), Some("abc123"));
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn env_layer_rejects_bad_flag() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(|k| (k == "TRASH_INSECURE_TLS").then(|| "maybe".to_string()))
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = AppConfig {
            timeout_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.timeout(), None);
        assert_eq!(AppConfig::default().timeout(), Some(Duration::from_secs(30)));
    }
}
