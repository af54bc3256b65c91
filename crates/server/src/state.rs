//! Shared application state and the chat operations both transports use.

use std::sync::Arc;
use std::time::Instant;

use ardi_core::AppConfig;
use ardi_core::cache::CacheStats;
use ardi_core::fallback::ErrorStats;
use ardi_core::knowledge::{DomainRegistry, DomainStatus, KnowledgeProcessor, KnowledgeResult, QueryOptions};
use ardi_core::perf::OverallStats;
use ardi_core::responses::{ResponseKind, ResponseProvider};
use ardi_core::validation::validate_chat_message;
use serde::Serialize;
use serde_json::Value;

use crate::envelope::VERSION;
use crate::error::ApiError;
use crate::rate_limit::RateLimiter;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    pub tracked_clients: usize,
    pub max_requests: u32,
    pub window_secs: u64,
}

/// Health and statistics snapshot served by `GET /api/chat`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub performance: OverallStats,
    pub cache: CacheStats,
    pub domains: Vec<DomainStatus>,
    pub errors: ErrorStats,
    pub rate_limit: RateLimitStatus,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub processor: Arc<KnowledgeProcessor>,
    pub limiter: Arc<RateLimiter>,
    pub responses: Arc<dyn ResponseProvider>,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, registry: DomainRegistry, responses: Arc<dyn ResponseProvider>) -> Self {
        let processor = KnowledgeProcessor::from_config(&config, Arc::new(registry), Arc::clone(&responses));
        let limiter = RateLimiter::new(config.rate_limit_requests, config.rate_limit_window());
        Self {
            config: Arc::new(config),
            processor: Arc::new(processor),
            limiter: Arc::new(limiter),
            responses,
            started_at: Instant::now(),
        }
    }

    /// Query options taken from configuration.
    pub fn default_options(&self) -> QueryOptions {
        QueryOptions::from_config(&self.config)
    }

    /// Validate a `{message}` payload and answer it.
    ///
    /// When no domain matches, the answer is a canned "no match" reply
    /// rather than an error.
    pub async fn ask(
        &self, payload: &Value, options: &QueryOptions, request_id: &str,
    ) -> Result<KnowledgeResult, ApiError> {
        let checked = validate_chat_message(payload);
        let Some(message) = checked.sanitized else {
            return Err(ApiError::Validation(checked.report.errors));
        };

        let answer = self
            .processor
            .process_query_for(&message, options, Some(request_id))
            .await
            .map_err(ApiError::Processing)?;

        Ok(answer.unwrap_or_else(|| {
            tracing::info!(request_id, "no knowledge matched, sending canned reply");
            KnowledgeResult::new(self.responses.pick(ResponseKind::NoMatch), "ardi", "no_match").with_confidence(0.0)
        }))
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy",
            version: VERSION,
            uptime_secs: self.started_at.elapsed().as_secs(),
            performance: self.processor.monitor().overall_stats(),
            cache: self.processor.cache().stats(),
            domains: self.processor.registry().status(),
            errors: self.processor.errors().error_stats(),
            rate_limit: RateLimitStatus {
                tracked_clients: self.limiter.tracked_clients(),
                max_requests: self.config.rate_limit_requests,
                window_secs: self.config.rate_limit_window_secs,
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use ardi_core::responses::FixedResponse;

    pub fn state_with(config: AppConfig) -> AppState {
        let registry = ardi_domains::default_registry().expect("built-in domains register");
        AppState::new(config, registry, Arc::new(FixedResponse("canned reply".into())))
    }

    pub fn state() -> AppState {
        state_with(AppConfig::default())
    }
}
