use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{CompatibilityRule, GeoPoint};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub routing: RoutingSettings,
    pub donors: DonorSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub geocoding: GeocodingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingSettings {
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    #[serde(default)]
    pub compatibility: CompatibilityRule,
    pub max_results: Option<usize>,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            compatibility: CompatibilityRule::default(),
            max_results: None,
        }
    }
}

fn default_radius_km() -> f64 { 10.0 }

/// Where donor candidates come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonorSource {
    #[default]
    Mock,
    Postgres,
}

/// Where pledges and profiles are stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonorSettings {
    #[serde(default)]
    pub source: DonorSource,
    #[serde(default)]
    pub registry: RegistryBackend,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocodingProvider {
    #[default]
    Fixed,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingSettings {
    #[serde(default)]
    pub provider: GeocodingProvider,
    pub endpoint: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_fixed_latitude")]
    pub fixed_latitude: f64,
    #[serde(default = "default_fixed_longitude")]
    pub fixed_longitude: f64,
}

impl GeocodingSettings {
    pub fn fixed_location(&self) -> GeoPoint {
        GeoPoint::new(self.fixed_latitude, self.fixed_longitude)
    }
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            provider: GeocodingProvider::default(),
            endpoint: None,
            user_agent: default_user_agent(),
            timeout_secs: default_geocoding_timeout(),
            fixed_latitude: default_fixed_latitude(),
            fixed_longitude: default_fixed_longitude(),
        }
    }
}

fn default_user_agent() -> String { format!("lifeline-connect/{}", env!("CARGO_PKG_VERSION")) }
fn default_geocoding_timeout() -> u64 { 10 }
// Downtown Los Angeles
fn default_fixed_latitude() -> f64 { 34.0522 }
fn default_fixed_longitude() -> f64 { -118.2437 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "full".to_string() }

impl Settings {
    /// Load configuration from defaults, files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LIFELINE__)
    pub fn load() -> Result<Self, ConfigError> {
        let builder = with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LIFELINE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LIFELINE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        apply_env_overrides(builder)?.build()?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = with_defaults(Config::builder())?
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LIFELINE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080_i64)?
        .set_default("routing.default_radius_km", default_radius_km())?
        .set_default("routing.compatibility", "exact")?
        .set_default("donors.source", "mock")?
        .set_default("donors.registry", "memory")
}

/// Well-known variables that bypass the LIFELINE__ prefix
fn apply_env_overrides(
    mut builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    use std::env;

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    Ok(builder)
}
