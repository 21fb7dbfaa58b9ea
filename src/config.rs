use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::DEFAULT_SEARCH_RADIUS_KM;
use crate::services::{RoutingStrategy, SHARED_ROUTING_KEY};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub directory: DirectorySettings,
    pub redis: RedisSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
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
pub struct DirectorySettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    PerOwner,
    Shared,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_routing_mode")]
    pub routing: RoutingMode,
    #[serde(default = "default_shared_routing_key")]
    pub shared_routing_key: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            routing: default_routing_mode(),
            shared_routing_key: default_shared_routing_key(),
        }
    }
}

impl NotificationSettings {
    pub fn routing_strategy(&self) -> RoutingStrategy {
        match self.routing {
            RoutingMode::PerOwner => RoutingStrategy::PerOwner,
            RoutingMode::Shared => RoutingStrategy::Shared(self.shared_routing_key.clone()),
        }
    }
}

fn default_routing_mode() -> RoutingMode { RoutingMode::PerOwner }
fn default_shared_routing_key() -> String { SHARED_ROUTING_KEY.to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_search_radius_km")]
    pub default_search_radius_km: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_search_radius_km: default_search_radius_km(),
        }
    }
}

fn default_search_radius_km() -> f64 { DEFAULT_SEARCH_RADIUS_KM }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_l1_cache_size")]
    pub l1_cache_size: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            l1_cache_size: default_l1_cache_size(),
        }
    }
}

fn default_ttl_secs() -> u64 { 300 }
fn default_l1_cache_size() -> u64 { 1000 }

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
fn default_log_format() -> String { "json".to_string() }

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    /// Unknown values fall back to JSON
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "compact" | "text" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with SNIF__)
    /// 4. `REDIS_URL`, `SNIF_DIRECTORY__BASE_URL`, `SNIF_DIRECTORY__API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SNIF__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SNIF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SNIF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment overrides on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("redis.url", env::var("REDIS_URL").ok()),
        ("directory.base_url", env::var("SNIF_DIRECTORY__BASE_URL").ok()),
        ("directory.api_key", env::var("SNIF_DIRECTORY__API_KEY").ok()),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (key, value) in overrides {
        if let Some(value) = value {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
