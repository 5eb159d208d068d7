//! # Configuration
//!
//! Application configuration loading and management.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override earlier):
//! 1. Default values
//! 2. Configuration file (if exists), `SHIPPING_RATES_CONFIG_FILE` or `config.toml`
//! 3. Environment variables prefixed with `SHIPPING_RATES__`, nested keys
//!    separated by `__`
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SHIPPING_RATES__LOG__LEVEL` | Log level | `info` |
//! | `SHIPPING_RATES__LOG__FORMAT` | Log format (json/pretty) | `json` |
//! | `SHIPPING_RATES__AGGREGATION__MAX_CONCURRENCY` | Concurrent courier tasks | `8` |
//! | `SHIPPING_RATES__AGGREGATION__PER_COURIER_TIMEOUT_MS` | Courier task budget | `5000` |
//! | `SHIPPING_RATES__AGGREGATION__OVERALL_TIMEOUT_MS` | Fan-out budget | `10000` |
//! | `SHIPPING_RATES__CACHE__BACKEND` | `memory` or `redis` | `memory` |
//! | `SHIPPING_RATES__CACHE__REDIS_URL` | Redis URL | - |
//! | `SHIPPING_RATES__CACHE__TTL_MINUTES` | Cached bundle TTL | `30` |
//! | `SHIPPING_RATES__PROVIDERS__AGGREGATOR__COURIERS` | Comma-separated courier codes | - |
//! | `SHIPPING_RATES__PROVIDERS__RIDE_HAILING__COURIERS` | Comma-separated courier codes | - |
//! | `SHIPPING_RATES__PROVIDERS__PRICE_TABLE__COURIERS` | Comma-separated courier codes | - |
//!
//! # Examples
//!
//! ```
//! use shipping_rates::config::AppConfig;
//!
//! let config = AppConfig::from_toml_str(
//!     r#"
//!     [cache]
//!     ttl_minutes = 5
//!
//!     [providers.price_table]
//!     couriers = ["internal"]
//!     "#,
//! )
//! .unwrap();
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.cache.ttl().as_secs(), 300);
//! ```

use crate::application::services::AggregationConfig;
use crate::domain::entities::CoverageLookup;
use crate::infrastructure::cache::in_memory::MAX_TTL;
use crate::infrastructure::cache::{CacheResult, InMemoryRateCache, RateCache, RedisRateCache};
use crate::infrastructure::providers::{
    AggregatorAdapter, AggregatorConfig, PriceTable, PriceTableAdapter, ProviderRegistry,
    ProviderResult, RideHailingAdapter, RideHailingConfig,
};
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const ENV_PREFIX: &str = "SHIPPING_RATES";
const CONFIG_FILE_VAR: &str = "SHIPPING_RATES_CONFIG_FILE";
const LIST_KEYS: [&str; 3] = [
    "providers.aggregator.couriers",
    "providers.ride_hailing.couriers",
    "providers.price_table.couriers",
];

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse a configuration source.
    #[error("failed to load config: {0}")]
    Load(String),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Load(err.to_string())
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

// ============================================================================
// Aggregation and Cache Configuration
// ============================================================================

/// Fan-out limits of the rate service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSettings {
    /// Maximum number of couriers quoted concurrently.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Time budget of one courier task in milliseconds.
    #[serde(default = "default_per_courier_timeout")]
    pub per_courier_timeout_ms: u64,

    /// Time budget of the whole fan-out in milliseconds.
    #[serde(default = "default_overall_timeout")]
    pub overall_timeout_ms: u64,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            per_courier_timeout_ms: default_per_courier_timeout(),
            overall_timeout_ms: default_overall_timeout(),
        }
    }
}

/// Rate cache backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process map.
    #[default]
    Memory,
    /// Shared Redis instance.
    Redis,
}

/// Rate cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Backend.
    #[serde(default)]
    pub backend: CacheBackend,

    /// Redis URL, required for the redis backend.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// TTL of cached bundles in minutes.
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            redis_url: None,
            ttl_minutes: default_ttl_minutes(),
        }
    }
}

impl CacheSettings {
    /// TTL as a duration.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Domestic aggregator credentials and the couriers it serves.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorSettings {
    /// API base URL.
    pub base_url: String,

    /// Shared secret sent in the API key header.
    pub api_key: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_provider_timeout")]
    pub timeout_ms: u64,

    /// Courier codes routed to this provider.
    #[serde(default)]
    pub couriers: Vec<String>,
}

impl fmt::Debug for AggregatorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatorSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("couriers", &self.couriers)
            .finish()
    }
}

/// Ride-hailing delivery provider credentials and the couriers it serves.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideHailingSettings {
    /// API base URL.
    pub base_url: String,

    /// OAuth2 client id.
    pub client_id: String,

    /// OAuth2 client secret.
    pub client_secret: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_provider_timeout")]
    pub timeout_ms: u64,

    /// Courier codes routed to this provider.
    #[serde(default)]
    pub couriers: Vec<String>,
}

impl fmt::Debug for RideHailingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RideHailingSettings")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("couriers", &self.couriers)
            .finish()
    }
}

/// Couriers priced from the internal price table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTableSettings {
    /// Courier codes routed to the price table.
    #[serde(default)]
    pub couriers: Vec<String>,

    /// Address piece the price table's areas are keyed on.
    #[serde(default)]
    pub coverage_lookup: CoverageLookup,
}

/// Provider routing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Domestic aggregator, if enabled.
    #[serde(default)]
    pub aggregator: Option<AggregatorSettings>,

    /// Ride-hailing provider, if enabled.
    #[serde(default)]
    pub ride_hailing: Option<RideHailingSettings>,

    /// Internal price table.
    #[serde(default)]
    pub price_table: PriceTableSettings,
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Aggregation limits.
    #[serde(default)]
    pub aggregation: AggregationSettings,

    /// Rate cache.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Provider routing.
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Loads configuration from the optional config file and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_FILE_VAR).unwrap_or_else(|_| "config.toml".to_string());
        Self::from_file(&path)
    }

    /// Loads configuration from `path` (skipped if missing) and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or a value has the wrong type.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let mut env = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .try_parsing(true);
        for key in LIST_KEYS {
            env = env.with_list_parse_key(key);
        }

        let config = config::Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(env)
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parses configuration from a TOML string, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "log.level",
                format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, valid_levels
                ),
            ));
        }

        if self.aggregation.max_concurrency == 0 {
            return Err(ConfigError::invalid(
                "aggregation.max_concurrency",
                "must be at least 1",
            ));
        }
        if self.aggregation.per_courier_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "aggregation.per_courier_timeout_ms",
                "must be positive",
            ));
        }
        if self.aggregation.overall_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "aggregation.overall_timeout_ms",
                "must be positive",
            ));
        }

        if self.cache.ttl_minutes == 0 {
            return Err(ConfigError::invalid("cache.ttl_minutes", "must be positive"));
        }
        if self.cache.ttl() > MAX_TTL {
            return Err(ConfigError::invalid(
                "cache.ttl_minutes",
                format!("must be at most {} minutes", MAX_TTL.as_secs() / 60),
            ));
        }
        if self.cache.backend == CacheBackend::Redis
            && self.cache.redis_url.as_deref().is_none_or(str::is_empty)
        {
            return Err(ConfigError::invalid(
                "cache.redis_url",
                "required when cache.backend is redis",
            ));
        }

        if let Some(aggregator) = &self.providers.aggregator {
            validate_provider("providers.aggregator", &aggregator.base_url, aggregator.timeout_ms)?;
        }
        if let Some(ride_hailing) = &self.providers.ride_hailing {
            validate_provider(
                "providers.ride_hailing",
                &ride_hailing.base_url,
                ride_hailing.timeout_ms,
            )?;
        }

        Ok(())
    }

    /// Aggregation settings for [`ShippingRateService`](crate::application::ShippingRateService).
    #[must_use]
    pub fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig::with_timeout(self.aggregation.overall_timeout_ms)
            .with_max_concurrency(self.aggregation.max_concurrency)
            .with_per_courier_timeout(self.aggregation.per_courier_timeout_ms)
            .with_cache_ttl(self.cache.ttl())
    }

    /// Builds the provider registry. Couriers not listed anywhere fall back
    /// to the default adapter.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn build_registry(&self, price_table: PriceTable) -> ProviderResult<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();

        if let Some(settings) = &self.providers.aggregator {
            let adapter = AggregatorAdapter::new(
                AggregatorConfig::new(&settings.base_url, &settings.api_key)
                    .with_timeout_ms(settings.timeout_ms),
            )?;
            registry.register_all(settings.couriers.iter().map(String::as_str), Arc::new(adapter));
        }

        if let Some(settings) = &self.providers.ride_hailing {
            let adapter = RideHailingAdapter::new(
                RideHailingConfig::new(
                    &settings.base_url,
                    &settings.client_id,
                    &settings.client_secret,
                )
                .with_timeout_ms(settings.timeout_ms),
            )?;
            registry.register_all(settings.couriers.iter().map(String::as_str), Arc::new(adapter));
        }

        let table = &self.providers.price_table;
        if !table.couriers.is_empty() {
            let adapter =
                PriceTableAdapter::new(price_table).with_coverage_lookup(table.coverage_lookup);
            registry.register_all(table.couriers.iter().map(String::as_str), Arc::new(adapter));
        }

        info!(couriers = registry.len(), "provider registry built");
        Ok(registry)
    }

    /// Connects the configured cache backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis backend cannot be reached.
    pub async fn build_cache(&self) -> CacheResult<Arc<dyn RateCache>> {
        match (&self.cache.backend, &self.cache.redis_url) {
            (CacheBackend::Redis, Some(url)) => {
                let cache = RedisRateCache::connect(url).await?;
                Ok(Arc::new(cache))
            }
            _ => Ok(Arc::new(InMemoryRateCache::new())),
        }
    }
}

fn validate_provider(field: &str, base_url: &str, timeout_ms: u64) -> Result<(), ConfigError> {
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::invalid(
            &format!("{field}.base_url"),
            format!("'{base_url}' is not an http(s) URL"),
        ));
    }
    if timeout_ms == 0 {
        return Err(ConfigError::invalid(
            &format!("{field}.timeout_ms"),
            "must be positive",
        ));
    }
    Ok(())
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_concurrency() -> usize {
    8
}

fn default_per_courier_timeout() -> u64 {
    5000
}

fn default_overall_timeout() -> u64 {
    10000
}

fn default_ttl_minutes() -> u64 {
    30
}

fn default_provider_timeout() -> u64 {
    5000
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::CourierCode;

    const FULL: &str = r#"
        [log]
        level = "debug"
        format = "pretty"

        [aggregation]
        max_concurrency = 4
        per_courier_timeout_ms = 1500

        [cache]
        backend = "redis"
        redis_url = "redis://127.0.0.1:6379"
        ttl_minutes = 10

        [providers.aggregator]
        base_url = "https://rates.example.com"
        api_key = "secret-key"
        couriers = ["jne", "sicepat"]

        [providers.ride_hailing]
        base_url = "https://delivery.example.com"
        client_id = "client"
        client_secret = "hunter2"
        timeout_ms = 3000
        couriers = ["instant"]

        [providers.price_table]
        couriers = ["internal"]
        coverage_lookup = "subdistrict"
    "#;

    #[test]
    fn app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.aggregation.max_concurrency, 8);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.ttl(), Duration::from_secs(1800));
        assert!(config.providers.aggregator.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_full_toml() {
        let config = AppConfig::from_toml_str(FULL).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.aggregation.max_concurrency, 4);
        assert_eq!(config.aggregation.overall_timeout_ms, 10000);
        assert_eq!(config.cache.backend, CacheBackend::Redis);

        let aggregator = config.providers.aggregator.as_ref().unwrap();
        assert_eq!(aggregator.couriers, vec!["jne", "sicepat"]);
        assert_eq!(aggregator.timeout_ms, 5000);
        assert_eq!(
            config.providers.price_table.coverage_lookup,
            CoverageLookup::Subdistrict
        );

        let aggregation = config.aggregation_config();
        assert_eq!(aggregation.per_courier_timeout_ms, 1500);
        assert_eq!(aggregation.cache_ttl, Duration::from_secs(600));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = AppConfig::from_toml_str(FULL).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-key"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            AppConfig::from_toml_str("[cache\nttl_minutes = "),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn app_config_validate_invalid_log_level() {
        let mut config = AppConfig::default();
        config.log.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let mut config = AppConfig::default();
        config.aggregation.max_concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.aggregation.overall_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.cache.ttl_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_ttl() {
        let mut config = AppConfig::default();
        config.cache.ttl_minutes = 7 * 24 * 60;
        tokio_test::assert_ok!(config.validate());

        config.cache.ttl_minutes = u64::MAX;
        let err = tokio_test::assert_err!(config.validate());
        assert!(err.to_string().contains("cache.ttl_minutes"));
    }

    #[test]
    fn validate_requires_redis_url() {
        let mut config = AppConfig::default();
        config.cache.backend = CacheBackend::Redis;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cache.redis_url"));
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut config = AppConfig::from_toml_str(FULL).unwrap();
        if let Some(aggregator) = config.providers.aggregator.as_mut() {
            aggregator.base_url = "ftp://rates.example.com".to_string();
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn registry_routes_configured_couriers() {
        let config = AppConfig::from_toml_str(FULL).unwrap();
        let registry = config.build_registry(PriceTable::new()).unwrap();

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.resolve(&CourierCode::new("JNE")).name(), "aggregator");
        assert_eq!(
            registry.resolve(&CourierCode::new("instant")).name(),
            "ride_hailing"
        );
        let internal = registry.resolve(&CourierCode::new("internal"));
        assert_eq!(internal.name(), "price_table");
        assert_eq!(internal.coverage_lookup(), CoverageLookup::Subdistrict);
        assert_eq!(registry.resolve(&CourierCode::new("pos")).name(), "default");
    }

    #[tokio::test]
    async fn memory_cache_by_default() {
        let cache = AppConfig::default().build_cache().await.unwrap();
        assert!(cache.get("missing").await.unwrap().is_none());
    }
}
