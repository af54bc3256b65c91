//! Built-in fallback strategies.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ErrorContext, ErrorHandler, FallbackStrategy};
use crate::Error;
use crate::knowledge::{DOMAIN_FILTER_KEY, DomainRegistry, KnowledgeResult, QueryOptions, rank_results};
use crate::responses::{ResponseKind, ResponseProvider};

/// Retries a failed domain search one domain at a time, honoring the
/// caller's domain filter when the context carries one.
pub struct KnowledgeRetryStrategy {
    registry: Arc<DomainRegistry>,
    min_confidence: f64,
    unscored_confidence: f64,
}

impl KnowledgeRetryStrategy {
    pub const PRIORITY: i32 = 100;

    pub fn new(registry: Arc<DomainRegistry>, min_confidence: f64, unscored_confidence: f64) -> Self {
        Self { registry, min_confidence, unscored_confidence }
    }
}

#[async_trait]
impl FallbackStrategy for KnowledgeRetryStrategy {
    fn name(&self) -> &str {
        "knowledge_retry"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn can_handle(&self, error: &Error, context: &ErrorContext) -> bool {
        error.is_domain_error() && context.user_message.as_deref().is_some_and(|m| !m.trim().is_empty())
    }

    async fn execute(&self, _error: &Error, context: &ErrorContext) -> Result<KnowledgeResult, Error> {
        let query = context.user_message.as_deref().unwrap_or_default();
        let filter: Option<Vec<String>> = context
            .metadata
            .get(DOMAIN_FILTER_KEY)
            .and_then(|v| v.as_array())
            .map(|names| names.iter().filter_map(|n| n.as_str().map(str::to_string)).collect());
        let targets = self.registry.resolve(filter.as_deref())?;
        let fan_out = self.registry.search_sequential(query, &targets).await;

        rank_results(fan_out.results, self.min_confidence, 1, self.unscored_confidence)
            .into_iter()
            .next()
            .ok_or_else(|| Error::FallbackFailed("no domain answered on retry".into()))
    }
}

/// Answers timeouts and connectivity failures with a "try again" reply.
pub struct NetworkErrorStrategy {
    responses: Arc<dyn ResponseProvider>,
}

impl NetworkErrorStrategy {
    pub const PRIORITY: i32 = 80;

    pub fn new(responses: Arc<dyn ResponseProvider>) -> Self {
        Self { responses }
    }
}

#[async_trait]
impl FallbackStrategy for NetworkErrorStrategy {
    fn name(&self) -> &str {
        "network_error"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn can_handle(&self, error: &Error, _context: &ErrorContext) -> bool {
        if matches!(error, Error::Timeout(_) | Error::Network(_)) {
            return true;
        }
        let message = error.to_string().to_lowercase();
        ["timeout", "network", "connection"].iter().any(|needle| message.contains(needle))
    }

    async fn execute(&self, _error: &Error, _context: &ErrorContext) -> Result<KnowledgeResult, Error> {
        Ok(KnowledgeResult::new(self.responses.pick(ResponseKind::Network), "ardi", "system").with_confidence(0.0))
    }
}

/// Last resort: a generic canned reply for any error.
pub struct GenericResponseStrategy {
    responses: Arc<dyn ResponseProvider>,
}

impl GenericResponseStrategy {
    pub const PRIORITY: i32 = 10;

    pub fn new(responses: Arc<dyn ResponseProvider>) -> Self {
        Self { responses }
    }
}

#[async_trait]
impl FallbackStrategy for GenericResponseStrategy {
    fn name(&self) -> &str {
        "generic_response"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn can_handle(&self, _error: &Error, _context: &ErrorContext) -> bool {
        true
    }

    async fn execute(&self, _error: &Error, _context: &ErrorContext) -> Result<KnowledgeResult, Error> {
        Ok(KnowledgeResult::new(self.responses.pick(ResponseKind::Generic), "ardi", "general").with_confidence(0.0))
    }
}

impl ErrorHandler {
    /// A handler with the retry, network, and generic strategies registered.
    pub fn with_default_strategies(
        max_log_size: usize, development: bool, registry: Arc<DomainRegistry>, responses: Arc<dyn ResponseProvider>,
        defaults: &QueryOptions, unscored_confidence: f64,
    ) -> Self {
        let handler = Self::new(max_log_size, development);
        handler.register_fallback_strategy(Arc::new(KnowledgeRetryStrategy::new(
            registry,
            defaults.min_confidence,
            unscored_confidence,
        )));
        handler.register_fallback_strategy(Arc::new(NetworkErrorStrategy::new(Arc::clone(&responses))));
        handler.register_fallback_strategy(Arc::new(GenericResponseStrategy::new(responses)));
        handler
    }
}
