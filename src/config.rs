use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use std::{env, fs, path::Path, time::Duration};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    /// The single origin allowed by CORS.
    pub cors_origin: String,
    pub storage: StorageKind,
    pub database: DatabaseConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub dsn: Option<String>,
    pub connect_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: u64,
    #[serde(with = "humantime_serde")]
    pub window: Duration,
    /// Count each peer address separately instead of sharing one counter.
    pub per_client: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_origin: "http://localhost:5173".to_string(),
            storage: StorageKind::Postgres,
            database: DatabaseConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            connect_attempts: 5,
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
            per_client: true,
        }
    }
}

impl Config {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.storage == StorageKind::Postgres && self.database.dsn.is_none() {
            return Err(ConfigError::Invalid(
                "database.dsn (PG_DSN) is required for postgres storage",
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Invalid("rate_limit.max_requests must be positive"));
        }
        if self.rate_limit.window.is_zero() {
            return Err(ConfigError::Invalid("rate_limit.window must be positive"));
        }
        Ok(self)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Self::from_sources(contents, |_| None)
    }

    /// Builds a config from environment-style variables looked up through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::from_sources("", var)
    }

    /// Parses a YAML document, then lets any variable found through `var`
    /// replace the matching key.
    pub fn from_sources(
        contents: &str,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // An empty document means "all defaults".
        let mut root = if contents.trim().is_empty() {
            Mapping::new()
        } else {
            match serde_yaml::from_str::<Value>(contents)? {
                Value::Mapping(map) => map,
                Value::Null => Mapping::new(),
                _ => return Err(ConfigError::Invalid("config file must be a mapping")),
            }
        };

        merge(&mut root, vars_overlay(&var)?);

        serde_yaml::from_value::<Self>(Value::Mapping(root))?.validate()
    }
}

fn vars_overlay(var: &impl Fn(&str) -> Option<String>) -> Result<Mapping, ConfigError> {
    let mut root = Mapping::new();
    let mut database = Mapping::new();
    let mut rate_limit = Mapping::new();

    set_scalar(&mut root, "port", var("PORT"))?;
    set_string(&mut root, "cors_origin", var("CORS_ORIGIN"));
    set_string(&mut root, "storage", var("STORAGE"));

    set_string(&mut database, "dsn", var("PG_DSN"));
    set_scalar(&mut database, "connect_attempts", var("DB_CONNECT_ATTEMPTS"))?;
    set_string(&mut database, "retry_delay", var("DB_RETRY_DELAY"));

    set_scalar(&mut rate_limit, "max_requests", var("RATE_LIMIT_MAX_REQUESTS"))?;
    set_string(&mut rate_limit, "window", var("RATE_LIMIT_WINDOW"));
    set_scalar(&mut rate_limit, "per_client", var("RATE_LIMIT_PER_CLIENT"))?;

    if !database.is_empty() {
        root.insert("database".into(), Value::Mapping(database));
    }
    if !rate_limit.is_empty() {
        root.insert("rate_limit".into(), Value::Mapping(rate_limit));
    }
    Ok(root)
}

/// Copies `overlay` into `base`, descending into nested sections.
fn merge(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Mapping(inner)), Value::Mapping(value)) => merge(inner, value),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn set_string(map: &mut Mapping, key: &str, value: Option<String>) {
    if let Some(value) = value {
        map.insert(key.into(), Value::String(value));
    }
}

// Numbers and booleans go through the YAML scalar parser so they land with
// the right type.
fn set_scalar(map: &mut Mapping, key: &str, value: Option<String>) -> Result<(), ConfigError> {
    if let Some(value) = value {
        map.insert(key.into(), serde_yaml::from_str::<Value>(&value)?);
    }
    Ok(())
}

// Environment variables win over whatever the file sets.
fn read_file(path: &str) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    Config::from_sources(&contents, |key| env::var(key).ok())
}

pub fn load_config() -> Result<Config, ConfigError> {
    // Retrieve env variable
    let config_path = env::var("NOTES_API_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        tracing::info!("Loading configuration from '{}'", config_path);
        return read_file(&config_path);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return read_file("config.yaml");
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        return read_file("config.example.yaml");
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    Config::from_vars(|key| env::var(key).ok())
}
