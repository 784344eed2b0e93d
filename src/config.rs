//! Application-level configuration loading, including storage backend selection.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GAME_DATA_CONFIG_PATH";
/// Environment variable carrying the relational store connection string.
const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Environment variable overriding the configured storage backend.
const STORAGE_BACKEND_ENV: &str = "STORAGE_BACKEND";
/// Name given to players that do not provide one.
pub const DEFAULT_USERNAME: &str = "Игрок";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Storage implementation backing the game data handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// PostgreSQL reached through `DATABASE_URL`.
    Postgres,
    /// Process-local store, lost on restart.
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Settings for the relational store connection.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Which backend to install at startup.
    pub backend: StorageBackend,
    /// Connection string, when one was provided.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long an operation waits for a pooled connection.
    pub acquire_timeout: Duration,
    /// Create tables and seed the achievement catalog on startup.
    pub apply_schema: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Postgres,
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            apply_schema: false,
        }
    }
}

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port the HTTP server listens on.
    pub port: u16,
    /// Username used when a profile request does not name one.
    pub default_username: String,
    /// Storage settings.
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load the configuration file, then apply environment overrides.
    ///
    /// A missing or unreadable file falls back to built-in defaults so the server can always start.
    pub fn load() -> Self {
        let mut config = Self::from_file();
        config.apply_env(|key| env::var(key).ok());
        config
    }

    /// Configuration for an in-memory store, mostly useful for tests and local runs.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                ..StorageConfig::default()
            },
            ..Self::default()
        }
    }

    fn from_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.storage.database_url = Some(url);
        }

        if let Some(port) = lookup("PORT").or_else(|| lookup("SERVER_PORT")) {
            match port.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(err) => warn!(value = %port, error = %err, "ignoring invalid port override"),
            }
        }

        if let Some(value) = lookup(STORAGE_BACKEND_ENV) {
            match StorageBackend::parse(&value) {
                Some(backend) => self.storage.backend = backend,
                None => warn!(value = %value, "ignoring unknown storage backend override"),
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_username: DEFAULT_USERNAME.to_owned(),
            storage: StorageConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    port: Option<u16>,
    default_username: Option<String>,
    storage: RawStorageConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStorageConfig {
    backend: Option<StorageBackend>,
    database_url: Option<String>,
    max_connections: Option<u32>,
    acquire_timeout_secs: Option<u64>,
    apply_schema: Option<bool>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = StorageConfig::default();
        let raw = value.storage;
        Self {
            port: value.port.unwrap_or(DEFAULT_PORT),
            default_username: value
                .default_username
                .unwrap_or_else(|| DEFAULT_USERNAME.to_owned()),
            storage: StorageConfig {
                backend: raw.backend.unwrap_or(defaults.backend),
                database_url: raw.database_url,
                max_connections: raw.max_connections.unwrap_or(defaults.max_connections),
                acquire_timeout: raw
                    .acquire_timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.acquire_timeout),
                apply_schema: raw.apply_schema.unwrap_or(defaults.apply_schema),
            },
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_raw_config_fills_missing_keys_with_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"storage": {"backend": "memory"}}"#).unwrap();
        let config: AppConfig = raw.into();

        assert_eq!(config.port, 8080);
        assert_eq!(config.default_username, DEFAULT_USERNAME);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.storage.acquire_timeout, Duration::from_secs(5));
        assert!(!config.storage.apply_schema);
    }

    #[test]
    fn test_env_overrides_take_precedence() {
        let mut config = AppConfig::default();
        config.apply_env(lookup_from(&[
            ("DATABASE_URL", "postgres://game@localhost/game"),
            ("SERVER_PORT", "9000"),
            ("STORAGE_BACKEND", "Memory"),
        ]));

        assert_eq!(
            config.storage.database_url.as_deref(),
            Some("postgres://game@localhost/game")
        );
        assert_eq!(config.port, 9000);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(lookup_from(&[
            ("DATABASE_URL", "   "),
            ("PORT", "not-a-port"),
            ("STORAGE_BACKEND", "cassandra"),
        ]));

        assert_eq!(config.storage.database_url, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
    }
}
