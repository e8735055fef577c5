//! Configuration module for loading and parsing TOML configuration files.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Contract cache and search index backend.
    pub cache: CacheConfig,
    /// Search result sizing.
    pub search: SearchConfig,
    /// Legacy document store.
    pub database: DatabaseConfig,
    /// Watchlist hydration cache.
    pub watchlist: WatchlistConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Which implementation backs the contract cache and the search index.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// Redis with the RediSearch module.
    #[default]
    Redis,
    /// In-process maps, optionally seeded from a JSON file.
    Memory,
}

/// Contract cache and search index configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Which backend serves the contract cache and search index.
    pub backend: CacheBackend,
    /// Redis connection URL.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: usize,
    /// Budget for the health-check ping.
    pub ping_timeout_ms: u64,
    /// Budget for every other command.
    pub op_timeout_ms: u64,
    /// `COUNT` hint for hash scans.
    pub scan_batch: usize,
    /// RediSearch index name.
    pub index_name: String,
    /// JSON array of instrument records loaded by the memory backend.
    pub seed_path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            url: Some("redis://127.0.0.1:6379".to_string()),
            pool_size: 16,
            ping_timeout_ms: 500,
            op_timeout_ms: 3000,
            scan_batch: 1000,
            index_name: "scrip_idx".to_string(),
            seed_path: None,
        }
    }
}

/// Search limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Capacity used when a request omits it.
    pub default_capacity: usize,
    /// Upper bound applied to requested capacities.
    pub max_capacity: usize,
    /// Page size of the legacy search.
    pub legacy_page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_capacity: 10,
            max_capacity: 50,
            legacy_page_size: 20,
        }
    }
}

/// Legacy document store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string. Without it only the memory backend
    /// serves the legacy search.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub max_connections: u32,
    /// Connection acquire timeout in milliseconds.
    pub acquire_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_ms: 5000,
        }
    }
}

/// Watchlist hydration cache configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchlistConfig {
    /// Local hour of the daily reset.
    pub reset_hour: u32,
    /// Local minute of the daily reset.
    pub reset_minute: u32,
    /// Offset of the reset time zone east of UTC.
    pub utc_offset_minutes: i32,
    /// Load the whole contract cache at startup.
    pub warm_on_start: bool,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            reset_hour: 8,
            reset_minute: 30,
            utc_offset_minutes: 330,
            warm_on_start: false,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Loads `path` when it exists, otherwise starts from defaults, then
    /// applies `HOST` and `PORT` overrides.
    ///
    /// # Errors
    /// Returns error if the file exists but is invalid, or an override does not parse.
    pub fn from_env_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = if path.as_ref().exists() {
            Self::load(path)?
        } else {
            Self::default()
        };

        if let Ok(host) = std::env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT {} is not a port", port)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        let search = &self.search;
        if search.default_capacity == 0 || search.max_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "search capacities must be positive".to_string(),
            ));
        }
        if search.default_capacity > search.max_capacity {
            return Err(ConfigError::InvalidValue(format!(
                "default_capacity {} exceeds max_capacity {}",
                search.default_capacity, search.max_capacity
            )));
        }
        if search.legacy_page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "legacy_page_size must be positive".to_string(),
            ));
        }

        let cache = &self.cache;
        if cache.ping_timeout_ms == 0 || cache.op_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "cache timeouts must be positive".to_string(),
            ));
        }
        if cache.pool_size == 0 || cache.scan_batch == 0 {
            return Err(ConfigError::InvalidValue(
                "cache pool_size and scan_batch must be positive".to_string(),
            ));
        }
        if cache.backend == CacheBackend::Redis && cache.url.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::InvalidValue(
                "redis backend requires cache.url".to_string(),
            ));
        }

        let watchlist = &self.watchlist;
        if watchlist.reset_hour > 23 || watchlist.reset_minute > 59 {
            return Err(ConfigError::InvalidValue(format!(
                "reset time {:02}:{:02} is out of range",
                watchlist.reset_hour, watchlist.reset_minute
            )));
        }
        if watchlist.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ConfigError::InvalidValue(format!(
                "utc_offset_minutes {} is out of range",
                watchlist.utc_offset_minutes
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 3000

[cache]
backend = "memory"
seed_path = "data/seed.json"
op_timeout_ms = 1500

[search]
default_capacity = 5
max_capacity = 25

[database]
url = "postgres://localhost/scrips"

[watchlist]
warm_on_start = true
"#;

        let config = Config::parse(toml_content).expect("should parse");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.seed_path, Some(PathBuf::from("data/seed.json")));
        assert_eq!(config.cache.op_timeout_ms, 1500);
        assert_eq!(config.cache.ping_timeout_ms, 500);
        assert_eq!(config.search.default_capacity, 5);
        assert_eq!(config.search.legacy_page_size, 20);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/scrips")
        );
        assert!(config.watchlist.warm_on_start);
        assert_eq!(config.watchlist.reset_hour, 8);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").expect("should parse");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.cache.index_name, "scrip_idx");
        assert_eq!(config.search.max_capacity, 50);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_validation_capacities() {
        let mut config = Config::default();
        config.search.default_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.default_capacity = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_redis_without_url() {
        let mut config = Config::default();
        config.cache.url = None;
        assert!(config.validate().is_err());

        config.cache.backend = CacheBackend::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_timeouts_and_reset_time() {
        let mut config = Config::default();
        config.cache.ping_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.watchlist.reset_minute = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result = Config::parse("[cache]\nbackend = \"memcached\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
