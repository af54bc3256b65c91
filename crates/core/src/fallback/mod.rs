//! Error logging and the prioritized fallback chain.
//!
//! When query processing fails, [`ErrorHandler::handle_error`] records the
//! error and walks the registered strategies from highest to lowest
//! priority. The first strategy that accepts the error and runs without
//! failing supplies the answer. If none does, the caller gets a structured
//! [`ErrorResponse`] instead.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::Error;
use crate::knowledge::KnowledgeResult;

mod strategies;

pub use strategies::{GenericResponseStrategy, KnowledgeRetryStrategy, NetworkErrorStrategy};

/// Errors listed in `ErrorStats::recent`.
const RECENT_ERRORS: usize = 10;

/// Messages listed in `ErrorStats::top_messages`.
const TOP_MESSAGES: usize = 5;

const GENERIC_ERROR_MESSAGE: &str =
    "Sorry, something went wrong while answering your question. Please try again in a moment.";

/// Where and for whom an error happened.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub operation: String,
    pub user_message: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub metadata: Map<String, Value>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            user_message: None,
            timestamp: Utc::now(),
            request_id: uuid::Uuid::new_v4().to_string(),
            metadata: Map::new(),
        }
    }

    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = Some(message.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

/// A recovery handler tried when processing fails.
#[async_trait]
pub trait FallbackStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Higher runs first.
    fn priority(&self) -> i32;

    fn can_handle(&self, error: &Error, context: &ErrorContext) -> bool;

    async fn execute(&self, error: &Error, context: &ErrorContext) -> Result<KnowledgeResult, Error>;
}

/// Returned when no fallback strategy could answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    /// Underlying error text, only in development mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub operation: String,
    pub code: String,
    pub message: String,
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageCount {
    pub message: String,
    pub count: u64,
}

/// Snapshot of the error log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorStats {
    /// Errors seen since startup.
    pub total_errors: u64,
    /// Errors per operation since startup.
    pub by_operation: BTreeMap<String, u64>,
    /// Most frequent messages among the retained records.
    pub top_messages: Vec<MessageCount>,
    /// Newest retained records, newest first.
    pub recent: Vec<ErrorRecord>,
}

#[derive(Debug, Default)]
struct ErrorLog {
    records: VecDeque<ErrorRecord>,
    total: u64,
    by_operation: BTreeMap<String, u64>,
}

pub struct ErrorHandler {
    strategies: RwLock<Vec<Arc<dyn FallbackStrategy>>>,
    log: Mutex<ErrorLog>,
    max_log_size: usize,
    development: bool,
}

impl ErrorHandler {
    /// A handler with no strategies registered.
    pub fn new(max_log_size: usize, development: bool) -> Self {
        Self {
            strategies: RwLock::new(Vec::new()),
            log: Mutex::new(ErrorLog::default()),
            max_log_size: max_log_size.max(1),
            development,
        }
    }

    /// Add a strategy, keeping the list ordered by descending priority.
    ///
    /// Strategies with equal priority keep their registration order.
    pub fn register_fallback_strategy(&self, strategy: Arc<dyn FallbackStrategy>) {
        let mut strategies = self.strategies.write();
        strategies.push(strategy);
        strategies.sort_by_key(|s| std::cmp::Reverse(s.priority()));
    }

    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies.read().iter().map(|s| s.name().to_string()).collect()
    }

    /// Log `error`, then try each matching strategy in priority order.
    pub async fn handle_error(&self, error: &Error, context: &ErrorContext) -> Result<KnowledgeResult, ErrorResponse> {
        self.log_error(error, context);

        let strategies: Vec<Arc<dyn FallbackStrategy>> = self.strategies.read().clone();
        for strategy in strategies.iter().filter(|s| s.can_handle(error, context)) {
            match strategy.execute(error, context).await {
                Ok(mut result) => {
                    tracing::info!(
                        strategy = strategy.name(),
                        request_id = %context.request_id,
                        "fallback strategy produced a response"
                    );
                    result.metadata.fallback_used = true;
                    result.metadata.fallback_strategy = Some(strategy.name().to_string());
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), error = %e, "fallback strategy failed");
                }
            }
        }

        tracing::error!(
            operation = %context.operation,
            request_id = %context.request_id,
            error = %error,
            "no fallback strategy could handle error"
        );

        Err(ErrorResponse {
            error: GENERIC_ERROR_MESSAGE.to_string(),
            code: "INTERNAL_ERROR".to_string(),
            details: self.development.then(|| error.to_string()),
            timestamp: Utc::now(),
            request_id: context.request_id.clone(),
        })
    }

    fn log_error(&self, error: &Error, context: &ErrorContext) {
        tracing::warn!(
            operation = %context.operation,
            request_id = %context.request_id,
            code = error.code(),
            error = %error,
            "query processing failed"
        );

        let mut log = self.log.lock();
        log.total += 1;
        *log.by_operation.entry(context.operation.clone()).or_default() += 1;
        log.records.push_back(ErrorRecord {
            operation: context.operation.clone(),
            code: error.code().to_string(),
            message: error.to_string(),
            request_id: context.request_id.clone(),
            timestamp: context.timestamp,
        });
        while log.records.len() > self.max_log_size {
            log.records.pop_front();
        }
    }

    pub fn error_stats(&self) -> ErrorStats {
        let log = self.log.lock();

        let mut counts: HashMap<&str, u64> = HashMap::new();
        for record in &log.records {
            *counts.entry(record.message.as_str()).or_default() += 1;
        }
        let mut top_messages: Vec<MessageCount> =
            counts.into_iter().map(|(message, count)| MessageCount { message: message.to_string(), count }).collect();
        top_messages.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.message.cmp(&b.message)));
        top_messages.truncate(TOP_MESSAGES);

        ErrorStats {
            total_errors: log.total,
            by_operation: log.by_operation.clone(),
            top_messages,
            recent: log.records.iter().rev().take(RECENT_ERRORS).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        name: &'static str,
        priority: i32,
        handles: bool,
        fails: bool,
    }

    #[async_trait]
    impl FallbackStrategy for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn can_handle(&self, _error: &Error, _context: &ErrorContext) -> bool {
            self.handles
        }

        async fn execute(&self, _error: &Error, _context: &ErrorContext) -> Result<KnowledgeResult, Error> {
            if self.fails {
                return Err(Error::FallbackFailed(self.name.into()));
            }
            Ok(KnowledgeResult::new(format!("from {}", self.name), "ardi", "fallback"))
        }
    }

    fn scripted(name: &'static str, priority: i32, handles: bool, fails: bool) -> Arc<dyn FallbackStrategy> {
        Arc::new(Scripted { name, priority, handles, fails })
    }

    fn context() -> ErrorContext {
        ErrorContext::new("test.op").with_user_message("what is um")
    }

    #[tokio::test]
    async fn test_highest_priority_wins() {
        let handler = ErrorHandler::new(10, false);
        handler.register_fallback_strategy(scripted("low", 50, true, false));
        handler.register_fallback_strategy(scripted("high", 100, true, false));

        let result = handler.handle_error(&Error::Internal("boom".into()), &context()).await.unwrap();
        assert_eq!(result.content, "from high");
        assert!(result.metadata.fallback_used);
        assert_eq!(result.metadata.fallback_strategy.as_deref(), Some("high"));
    }

    #[tokio::test]
    async fn test_falls_through_when_higher_strategy_fails() {
        let handler = ErrorHandler::new(10, false);
        handler.register_fallback_strategy(scripted("high", 100, true, true));
        handler.register_fallback_strategy(scripted("low", 50, true, false));

        let result = handler.handle_error(&Error::Internal("boom".into()), &context()).await.unwrap();
        assert_eq!(result.content, "from low");
    }

    #[tokio::test]
    async fn test_skips_strategies_that_cannot_handle() {
        let handler = ErrorHandler::new(10, false);
        handler.register_fallback_strategy(scripted("picky", 100, false, false));
        handler.register_fallback_strategy(scripted("any", 10, true, false));

        let result = handler.handle_error(&Error::Internal("boom".into()), &context()).await.unwrap();
        assert_eq!(result.metadata.fallback_strategy.as_deref(), Some("any"));
    }

    #[tokio::test]
    async fn test_structured_error_when_all_fail() {
        let handler = ErrorHandler::new(10, false);
        handler.register_fallback_strategy(scripted("broken", 100, true, true));

        let ctx = context().with_request_id("req-1");
        let err = handler.handle_error(&Error::Internal("boom".into()), &ctx).await.unwrap_err();
        assert_eq!(err.code, "INTERNAL_ERROR");
        assert_eq!(err.request_id, "req-1");
        assert!(err.details.is_none());
        assert!(!err.error.contains("boom"));
    }

    #[tokio::test]
    async fn test_development_mode_includes_details() {
        let handler = ErrorHandler::new(10, true);
        let err = handler.handle_error(&Error::Internal("boom".into()), &context()).await.unwrap_err();
        assert_eq!(err.details.as_deref(), Some("INTERNAL_ERROR: boom"));
    }

    #[test]
    fn test_registration_sorts_by_priority() {
        let handler = ErrorHandler::new(10, false);
        handler.register_fallback_strategy(scripted("b", 50, true, false));
        handler.register_fallback_strategy(scripted("a", 100, true, false));
        handler.register_fallback_strategy(scripted("c", 50, true, false));
        assert_eq!(handler.strategy_names(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_error_stats() {
        let handler = ErrorHandler::new(3, false);
        for i in 0..4 {
            let ctx = ErrorContext::new(if i % 2 == 0 { "even" } else { "odd" });
            let _ = handler.handle_error(&Error::Timeout("slow".into()), &ctx).await;
        }
        let _ = handler.handle_error(&Error::Internal("boom".into()), &ErrorContext::new("odd")).await;

        let stats = handler.error_stats();
        assert_eq!(stats.total_errors, 5);
        assert_eq!(stats.by_operation["even"], 2);
        assert_eq!(stats.by_operation["odd"], 3);
        assert_eq!(stats.recent.len(), 3);
        assert_eq!(stats.recent[0].code, "INTERNAL_ERROR");
        assert_eq!(stats.top_messages[0].message, "TIMEOUT: slow");
        assert_eq!(stats.top_messages[0].count, 2);
    }
}
