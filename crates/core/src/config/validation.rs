//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `bind_addr` is not a socket address
    /// - `cache_max_size` is 0 or exceeds 100000
    /// - `cache_ttl_secs` is 0 or exceeds one day
    /// - a confidence value is outside 0.0..=1.0
    /// - a rate limit, history or log size is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(invalid("bind_addr", "must be a socket address like 127.0.0.1:3000"));
        }

        if self.cache_max_size == 0 {
            return Err(invalid("cache_max_size", "must be greater than 0"));
        }
        if self.cache_max_size > 100_000 {
            return Err(invalid("cache_max_size", "must not exceed 100000"));
        }

        if self.cache_ttl_secs == 0 {
            return Err(invalid("cache_ttl_secs", "must be greater than 0"));
        }
        if self.cache_ttl_secs > 86_400 {
            return Err(invalid("cache_ttl_secs", "must not exceed one day (86400s)"));
        }

        if self.perf_max_history < 10 {
            return Err(invalid("perf_max_history", "must be at least 10"));
        }
        if self.error_log_size == 0 {
            return Err(invalid("error_log_size", "must be greater than 0"));
        }

        if self.preload_weight_threshold > 10 {
            return Err(invalid("preload_weight_threshold", "must be between 0 and 10"));
        }
        if self.max_results == 0 {
            return Err(invalid("max_results", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(invalid("min_confidence", "must be between 0.0 and 1.0"));
        }
        if !(0.0..=1.0).contains(&self.unscored_confidence) {
            return Err(invalid("unscored_confidence", "must be between 0.0 and 1.0"));
        }

        if self.rate_limit_requests == 0 {
            return Err(invalid("rate_limit_requests", "must be at least 1"));
        }
        if self.rate_limit_window_secs == 0 {
            return Err(invalid("rate_limit_window_secs", "must be at least 1"));
        }

        if self.development {
            tracing::warn!("development mode is on; error details will be included in responses");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_bind_addr() {
        let config = AppConfig { bind_addr: "localhost".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "bind_addr"));
    }

    #[test]
    fn test_validate_cache_size_zero() {
        let config = AppConfig { cache_max_size: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_max_size"));
    }

    #[test]
    fn test_validate_ttl_exceeds_limit() {
        let config = AppConfig { cache_ttl_secs: 86_401, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_ttl_secs"));
    }

    #[test]
    fn test_validate_min_confidence_out_of_range() {
        let config = AppConfig { min_confidence: 1.5, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "min_confidence"));
    }

    #[test]
    fn test_validate_threshold_out_of_range() {
        let config = AppConfig { preload_weight_threshold: 11, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "preload_weight_threshold"));
    }

    #[test]
    fn test_validate_zero_rate_limit() {
        let config = AppConfig { rate_limit_requests: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "rate_limit_requests"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            cache_max_size: 1,
            cache_ttl_secs: 86_400,
            perf_max_history: 10,
            min_confidence: 0.0,
            unscored_confidence: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
