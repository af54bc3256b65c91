//! Core of the Ardi knowledge service.
//!
//! This crate provides:
//! - Query response cache with TTL and batch eviction
//! - Performance monitoring with trend classification
//! - Input validation and chat message spam checks
//! - Lazily loaded knowledge domains and the query processor
//! - Prioritized fallback handling for failed queries
//! - Layered configuration and unified error types

pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod knowledge;
pub mod perf;
pub mod responses;
pub mod validation;

pub use cache::{CacheStats, ResponseCache};
pub use config::AppConfig;
pub use error::Error;
pub use fallback::{ErrorContext, ErrorHandler, ErrorResponse, FallbackStrategy};
pub use knowledge::{DomainRegistry, KnowledgeProcessor, KnowledgeResult, KnowledgeSource, QueryOptions};
pub use perf::PerformanceMonitor;
pub use responses::{ResponseProvider, TemplateResponses};
