use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::env;

use crate::models::analytics::{Dimension, Granularity, GroupBy};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub analytics: AnalyticsSettings,
    pub pricing: PricingSettings,
    pub session: SessionSettings,
    pub redis: RedisSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub request_timeout: u64, // milliseconds
    pub auth_token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub proxy_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsSettings {
    pub time_range: String,
    pub granularity: Granularity,
    pub group_by: GroupBy,
    pub dimension: Dimension,
    pub output: String, // "table" or "json"
}

/// Flat per-million rates used when a usage bucket carries no model to price by
#[derive(Debug, Deserialize, Clone)]
pub struct PricingSettings {
    pub fallback_input_per_million: f64,
    pub fallback_output_per_million: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub backend: String, // "memory" or "redis"
    pub key_prefix: String,
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: u8,
    pub pool_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String, // "json" or "pretty"
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .set_default("api.base_url", "https://qualitycompute.henosis.us")?
            .set_default("api.request_timeout", 30000)?
            .set_default("analytics.time_range", "7d")?
            .set_default("analytics.granularity", "daily")?
            .set_default("analytics.group_by", "model")?
            .set_default("analytics.dimension", "tokens")?
            .set_default("analytics.output", "table")?
            .set_default("pricing.fallback_input_per_million", 1.0)?
            .set_default("pricing.fallback_output_per_million", 2.0)?
            .set_default("session.backend", "memory")?
            .set_default("session.key_prefix", "qc_session:")?
            .set_default("redis.host", "localhost")?
            .set_default("redis.port", 6379)?
            .set_default("redis.db", 0)?
            .set_default("redis.pool_size", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load config file if exists
            .add_source(File::with_name("config/config").required(false))
            .add_source(File::with_name(&format!("config/config.{}", run_mode)).required(false));

        // Explicit environment overrides (config's Environment source lowercases keys)
        let overrides = [
            ("QC_API__BASE_URL", "api.base_url"),
            ("QC_API__REQUEST_TIMEOUT", "api.request_timeout"),
            ("QC_API__AUTH_TOKEN", "api.auth_token"),
            ("QC_API__EMAIL", "api.email"),
            ("QC_API__PASSWORD", "api.password"),
            ("QC_API__PROXY_URL", "api.proxy_url"),
            ("QC_ANALYTICS__TIME_RANGE", "analytics.time_range"),
            ("QC_ANALYTICS__GRANULARITY", "analytics.granularity"),
            ("QC_ANALYTICS__GROUP_BY", "analytics.group_by"),
            ("QC_ANALYTICS__DIMENSION", "analytics.dimension"),
            ("QC_ANALYTICS__OUTPUT", "analytics.output"),
            (
                "QC_PRICING__FALLBACK_INPUT_PER_MILLION",
                "pricing.fallback_input_per_million",
            ),
            (
                "QC_PRICING__FALLBACK_OUTPUT_PER_MILLION",
                "pricing.fallback_output_per_million",
            ),
            ("QC_SESSION__BACKEND", "session.backend"),
            ("QC_SESSION__KEY_PREFIX", "session.key_prefix"),
            ("QC_SESSION__TTL_SECONDS", "session.ttl_seconds"),
            ("QC_REDIS__HOST", "redis.host"),
            ("QC_REDIS__PORT", "redis.port"),
            ("QC_REDIS__PASSWORD", "redis.password"),
            ("QC_REDIS__DB", "redis.db"),
            ("QC_REDIS__POOL_SIZE", "redis.pool_size"),
            ("QC_LOGGING__LEVEL", "logging.level"),
            ("QC_LOGGING__FORMAT", "logging.format"),
        ];
        for (var, key) in overrides {
            if let Ok(val) = env::var(var) {
                builder = builder.set_override(key, val)?;
            }
        }

        // Same variable the web dashboard reads its API host from
        if env::var("QC_API__BASE_URL").is_err() {
            if let Ok(val) = env::var("REACT_APP_API_BASE_URL") {
                builder = builder.set_override("api.base_url", val)?;
            }
        }

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api.base_url.trim().is_empty() {
            return Err("API base URL must not be empty".to_string());
        }

        if self.api.request_timeout == 0 {
            return Err("API request timeout must be greater than 0".to_string());
        }

        let rates = [
            ("fallback_input_per_million", self.pricing.fallback_input_per_million),
            (
                "fallback_output_per_million",
                self.pricing.fallback_output_per_million,
            ),
        ];
        for (name, rate) in rates {
            if !rate.is_finite() || rate < 0.0 {
                return Err(format!(
                    "Pricing rate '{}' must be a non-negative number, got {}",
                    name, rate
                ));
            }
        }

        let valid_outputs = ["table", "json"];
        if !valid_outputs.contains(&self.analytics.output.as_str()) {
            return Err(format!(
                "Invalid analytics output '{}'. Must be one of: {}",
                self.analytics.output,
                valid_outputs.join(", ")
            ));
        }

        let valid_backends = ["memory", "redis"];
        if !valid_backends.contains(&self.session.backend.as_str()) {
            return Err(format!(
                "Invalid session backend '{}'. Must be one of: {}",
                self.session.backend,
                valid_backends.join(", ")
            ));
        }

        if self.redis.pool_size == 0 {
            return Err("Redis pool size must be greater than 0".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid logging level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(format!(
                "Invalid logging format '{}'. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        Ok(())
    }

    /// Get Redis connection string
    pub fn redis_url(&self) -> String {
        match &self.redis.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password, self.redis.host, self.redis.port, self.redis.db
            ),
            None => format!(
                "redis://{}:{}/{}",
                self.redis.host, self.redis.port, self.redis.db
            ),
        }
    }
}
