//! Built-in knowledge domains for Ardi.
//!
//! Each domain is a static table of keyword-matched answers. Domains are
//! registered unloaded; the tables are built on first use.

pub mod firm;
pub mod insurance;
pub mod legal_process;
pub mod matcher;
pub mod medical;
pub mod settlement;

use std::sync::Arc;

use ardi_core::Error;
use ardi_core::knowledge::{DomainRegistry, KnowledgeSource};

pub use matcher::{Entry, StaticDomain};

/// Name and preload weight of every built-in domain, in registration order.
pub const DOMAINS: &[(&str, u8)] =
    &[("insurance", 9), ("legal_process", 8), ("settlement", 7), ("medical", 6), ("firm", 4)];

fn build(name: &str) -> Result<Arc<dyn KnowledgeSource>, Error> {
    let entries = match name {
        "insurance" => insurance::entries(),
        "legal_process" => legal_process::entries(),
        "settlement" => settlement::entries(),
        "medical" => medical::entries(),
        "firm" => firm::entries(),
        other => return Err(Error::UnknownDomain(other.to_string())),
    };
    tracing::debug!(domain = name, entries = entries.len(), "built static knowledge domain");
    Ok(Arc::new(StaticDomain::new(name, entries)))
}

/// A registry with every built-in domain registered and unloaded.
///
/// # Errors
///
/// Returns `Error::DuplicateDomain` if a name is registered twice.
pub fn default_registry() -> Result<DomainRegistry, Error> {
    let mut registry = DomainRegistry::new();
    for &(name, weight) in DOMAINS {
        registry.register(name, weight, move || build(name))?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ardi_core::cache::ResponseCache;
    use ardi_core::fallback::ErrorHandler;
    use ardi_core::knowledge::{KnowledgeProcessor, QueryOptions};
    use ardi_core::perf::PerformanceMonitor;
    use ardi_core::responses::FixedResponse;
    use std::time::Duration;

    fn processor() -> KnowledgeProcessor {
        let registry = Arc::new(default_registry().unwrap());
        let errors = Arc::new(ErrorHandler::with_default_strategies(
            10,
            false,
            Arc::clone(&registry),
            Arc::new(FixedResponse("fallback".into())),
            &QueryOptions::default(),
            1.0,
        ));
        KnowledgeProcessor::new(
            registry,
            Arc::new(ResponseCache::new(100, Duration::from_secs(60))),
            Arc::new(PerformanceMonitor::new(100)),
            errors,
        )
    }

    #[test]
    fn test_default_registry_order() {
        let registry = default_registry().unwrap();
        assert_eq!(registry.names(), vec!["insurance", "legal_process", "settlement", "medical", "firm"]);
        assert!(registry.status().iter().all(|s| !s.loaded));
    }

    #[tokio::test]
    async fn test_preload_loads_weight_seven_and_up() {
        let registry = default_registry().unwrap();
        let report = registry.preload_high_priority(7).await;
        assert_eq!(report.loaded, vec!["insurance", "legal_process", "settlement"]);
        assert!(report.failed.is_empty());
        assert!(!registry.get("medical").unwrap().is_loaded());
    }

    #[tokio::test]
    async fn test_what_is_um_end_to_end() {
        let processor = processor();
        let options = QueryOptions::default();

        let first = processor.process_query("What is UM?", &options).await.unwrap().unwrap();
        assert_eq!(first.source, "insurance");
        assert!(first.content.contains("Uninsured Motorist"));
        assert!(!first.metadata.cache_hit);

        let second = processor.process_query("What is UM?", &options).await.unwrap().unwrap();
        assert!(second.metadata.cache_hit);
        assert_eq!(second.content, first.content);
    }

    #[tokio::test]
    async fn test_lor_routes_to_legal_process() {
        let result = processor().process_query("what is an LOR", &QueryOptions::default()).await.unwrap().unwrap();
        assert_eq!(result.source, "legal_process");
    }

    #[tokio::test]
    async fn test_domain_filter() {
        let options = QueryOptions { domains: Some(vec!["medical".into()]), ..Default::default() };
        let result = processor().process_query("What is UM?", &options).await.unwrap();
        assert_eq!(result, None);
    }
}
