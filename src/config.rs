/// Client configuration loader - parses vigicrues.toml and the environment
///
/// Keeps upstream endpoints and the request timeout out of the code so a
/// mirror or a local stub can be targeted without recompiling.
///
/// Precedence, later wins: built-in defaults, TOML file, environment
/// variables (`.env` is loaded first when present).

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_DISCOVERY_BASE_URL: &str = "https://public.opendatasoft.com/api/explore/v2.1/catalog/datasets/referentiel-des-stations-du-reseau-vigicrues";
pub const DEFAULT_VIGICRUES_BASE_URL: &str = "https://www.vigicrues.gouv.fr/services";
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "vigicrues.toml";

pub const ENV_DISCOVERY_URL: &str = "VIGICRUES_DISCOVERY_URL";
pub const ENV_BASE_URL: &str = "VIGICRUES_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "VIGICRUES_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Endpoints and transport settings shared by both API components.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// OpenDataSoft dataset URL; `/records` is appended for searches.
    pub discovery_base_url: String,
    /// Root of the Vigicrues operational services.
    pub vigicrues_base_url: String,
    /// Total request timeout, in seconds.
    pub timeout_secs: f64,
    /// Page size of catalog searches (offset is always 0).
    pub search_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            discovery_base_url: DEFAULT_DISCOVERY_BASE_URL.to_string(),
            vigicrues_base_url: DEFAULT_VIGICRUES_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Parses a TOML document. Absent keys keep their defaults.
    pub fn from_toml_str(contents: &str, path: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validated()
    }

    /// Reads a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_toml_str(&contents, &display)
    }

    /// Full lookup used by the CLI.
    ///
    /// An explicit `path` must exist; without one, `vigicrues.toml` is used
    /// only if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let base = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH)?,
            None => Self::default(),
        };

        base.with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from a key lookup (the process environment in
    /// production, a map in tests).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DISCOVERY_URL) {
            self.discovery_base_url = url;
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.vigicrues_base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS.to_string(),
                value: raw.clone(),
            })?;
        }
        self.validated()
    }

    /// Request timeout. Falls back to the default when `timeout_secs` is
    /// not a usable positive duration.
    pub fn timeout(&self) -> Duration {
        checked_timeout(self.timeout_secs).unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }

    /// Checks every field and normalises the URLs. Applied on every load
    /// path; call it on hand-built values before use.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if checked_timeout(self.timeout_secs).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs".to_string(),
                value: self.timeout_secs.to_string(),
            });
        }
        if self.search_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "search_limit".to_string(),
                value: "0".to_string(),
            });
        }
        for (key, url) in [
            ("discovery_base_url", &mut self.discovery_base_url),
            ("vigicrues_base_url", &mut self.vigicrues_base_url),
        ] {
            let trimmed = url.trim_end_matches('/').to_string();
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: url.clone(),
                });
            }
            *url = trimmed;
        }
        Ok(self)
    }
}

/// Positive timeout that reqwest can turn into a deadline from now.
fn checked_timeout(secs: f64) -> Option<Duration> {
    let timeout = Duration::try_from_secs_f64(secs).ok().filter(|t| !t.is_zero())?;
    Instant::now().checked_add(timeout).map(|_| timeout)
}
