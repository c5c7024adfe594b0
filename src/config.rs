//! Persistent application configuration model and defaults.

use std::path::PathBuf;

use log::warn;

/// Root configuration read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    #[serde(default)]
    /// Tracking database location.
    pub database: DatabaseConfig,
    #[serde(default)]
    /// Catalog search behavior.
    pub search: SearchConfig,
    #[serde(default)]
    /// Per-provider credentials.
    pub providers: ProvidersConfig,
}

/// Tracking database location preferences.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DatabaseConfig {
    /// Overrides the platform data-directory default when non-empty.
    #[serde(default)]
    pub path: String,
}

/// Catalog search behavior preferences.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

/// Credentials for catalog providers that require an API key.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub kinopoisk: ProviderAuthConfig,
    #[serde(default)]
    pub google_books: ProviderAuthConfig,
}

/// API key holder for one provider. An empty key means "query anonymously"
/// where the provider allows it.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ProviderAuthConfig {
    #[serde(default)]
    pub api_key: String,
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_read_timeout_secs() -> u64 {
    15
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

impl Config {
    /// Reads the config file from the platform config directory, falling
    /// back to defaults when the file is absent or unreadable.
    pub fn load_or_default() -> Config {
        let Some(path) = Config::file_path() else {
            return Config::default();
        };
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Config::default(),
            Err(err) => {
                warn!("could not read {}: {err}", path.display());
                return Config::default();
            }
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                warn!("could not parse {}: {err}", path.display());
                Config::default()
            }
        }
    }

    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("medialog").join("config.toml"))
    }

    /// Explicit database path from config, if one was set.
    pub fn database_path(&self) -> Option<PathBuf> {
        let path = self.database.path.trim();
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}
