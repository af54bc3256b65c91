//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (ARDI_*)
//! 2. TOML config file (if ARDI_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Which front end the server binary exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// JSON over HTTP (`/api/chat`).
    Http,
    /// MCP over stdio.
    Stdio,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (ARDI_*)
/// 2. TOML config file (if ARDI_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Front end to serve.
    ///
    /// Set via ARDI_TRANSPORT environment variable.
    #[serde(default = "default_transport")]
    pub transport: Transport,

    /// Listen address for the HTTP transport.
    ///
    /// Set via ARDI_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Maximum number of cached responses.
    #[serde(default = "default_cache_max_size")]
    pub cache_max_size: usize,

    /// Default time-to-live of a cached response, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Samples kept per operation by the performance monitor.
    #[serde(default = "default_perf_max_history")]
    pub perf_max_history: usize,

    /// Errors kept in the error handler's ring buffer.
    #[serde(default = "default_error_log_size")]
    pub error_log_size: usize,

    /// Domains at or above this weight are loaded at startup.
    #[serde(default = "default_preload_weight_threshold")]
    pub preload_weight_threshold: u8,

    /// Maximum ranked results considered per query.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Results below this confidence are dropped.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Confidence assumed for results that carry none.
    #[serde(default = "default_unscored_confidence")]
    pub unscored_confidence: f64,

    /// Fan out domain searches concurrently instead of one at a time.
    #[serde(default = "default_true")]
    pub parallel_search: bool,

    /// Requests allowed per client per window.
    #[serde(default = "default_rate_limit_requests")]
    pub rate_limit_requests: u32,

    /// Rate limit window length, in seconds.
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    /// Include error details in structured error responses.
    ///
    /// Set via ARDI_DEVELOPMENT environment variable.
    #[serde(default)]
    pub development: bool,
}

fn default_transport() -> Transport {
    Transport::Http
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".into()
}

fn default_cache_max_size() -> usize {
    1000
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_perf_max_history() -> usize {
    1000
}

fn default_error_log_size() -> usize {
    100
}

fn default_preload_weight_threshold() -> u8 {
    7
}

fn default_max_results() -> usize {
    3
}

fn default_min_confidence() -> f64 {
    0.1
}

fn default_unscored_confidence() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_rate_limit_requests() -> u32 {
    30
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            bind_addr: default_bind_addr(),
            cache_max_size: default_cache_max_size(),
            cache_ttl_secs: default_cache_ttl_secs(),
            perf_max_history: default_perf_max_history(),
            error_log_size: default_error_log_size(),
            preload_weight_threshold: default_preload_weight_threshold(),
            max_results: default_max_results(),
            min_confidence: default_min_confidence(),
            unscored_confidence: default_unscored_confidence(),
            parallel_search: true,
            rate_limit_requests: default_rate_limit_requests(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            development: false,
        }
    }
}

impl AppConfig {
    /// Cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Rate limit window as Duration.
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `ARDI_`
    /// 2. TOML file from `ARDI_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("ARDI_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("ARDI_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.transport, Transport::Http);
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.cache_max_size, 1000);
        assert_eq!(config.cache_ttl_secs, 3600);
        assert_eq!(config.preload_weight_threshold, 7);
        assert_eq!(config.max_results, 3);
        assert!(config.parallel_search);
        assert!(!config.development);
        assert_eq!(config.unscored_confidence, 1.0);
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
    }

    #[test]
    fn test_transport_serde() {
        let t: Transport = serde_json::from_str("\"stdio\"").unwrap();
        assert_eq!(t, Transport::Stdio);
        assert_eq!(serde_json::to_string(&Transport::Http).unwrap(), "\"http\"");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string("cache_max_size = 50\ndevelopment = true"))
            .extract()
            .unwrap();
        assert_eq!(config.cache_max_size, 50);
        assert!(config.development);
        assert_eq!(config.cache_ttl_secs, 3600);
    }
}
