//! Registry of named knowledge domains and fan-out search over them.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;

use super::KnowledgeResult;
use super::domain::{Domain, DomainLoader};
use crate::Error;

/// Loaded/unloaded state of one domain.
#[derive(Debug, Clone, Serialize)]
pub struct DomainStatus {
    pub name: String,
    pub weight: u8,
    pub loaded: bool,
}

/// Outcome of [`DomainRegistry::preload_high_priority`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreloadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<String>,
}

/// Results collected from a set of domains.
///
/// `results` are in registration order of the domains that produced them.
#[derive(Debug, Clone, Default)]
pub struct FanOut {
    pub results: Vec<KnowledgeResult>,
    pub searched: usize,
    pub failed: usize,
}

impl FanOut {
    /// True when at least one domain was searched and every one of them failed.
    pub fn all_failed(&self) -> bool {
        self.searched > 0 && self.failed == self.searched
    }
}

/// Domains in registration order, looked up by unique name.
///
/// Populated at startup and shared read-only afterwards.
#[derive(Debug, Default)]
pub struct DomainRegistry {
    domains: Vec<Arc<Domain>>,
    index: HashMap<String, usize>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an unloaded domain.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateDomain` if the name is taken.
    pub fn register(&mut self, name: &str, weight: u8, loader: impl DomainLoader + 'static) -> Result<(), Error> {
        self.register_loader(name, weight, Arc::new(loader))
    }

    pub fn register_loader(&mut self, name: &str, weight: u8, loader: Arc<dyn DomainLoader>) -> Result<(), Error> {
        if self.index.contains_key(name) {
            return Err(Error::DuplicateDomain(name.to_string()));
        }
        self.index.insert(name.to_string(), self.domains.len());
        self.domains.push(Arc::new(Domain::new(name, weight, loader)));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Domain>> {
        self.index.get(name).map(|&i| &self.domains[i])
    }

    pub fn names(&self) -> Vec<&str> {
        self.domains.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Load a domain by name if it is not loaded yet.
    pub async fn ensure_loaded(&self, name: &str) -> Result<(), Error> {
        let domain = self.get(name).ok_or_else(|| Error::UnknownDomain(name.to_string()))?;
        domain.ensure_loaded().await.map(|_| ())
    }

    /// Load every domain with `weight >= threshold`, concurrently.
    ///
    /// Failures are logged and reported, never returned as errors; the
    /// failed domains stay unloaded and load again on first search.
    pub async fn preload_high_priority(&self, threshold: u8) -> PreloadReport {
        let mut join_set = JoinSet::new();
        for domain in self.domains.iter().filter(|d| d.weight() >= threshold) {
            let domain = Arc::clone(domain);
            join_set.spawn(async move {
                let outcome = domain.ensure_loaded().await.map(|_| ());
                (domain.name().to_string(), outcome)
            });
        }

        let mut report = PreloadReport::default();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((name, Ok(()))) => report.loaded.push(name),
                Ok((name, Err(e))) => {
                    tracing::warn!(domain = %name, error = %e, "failed to preload knowledge domain");
                    report.failed.push(name);
                }
                Err(e) => tracing::warn!(error = %e, "domain preload task panicked"),
            }
        }

        report.loaded.sort();
        report.failed.sort();
        tracing::info!(loaded = report.loaded.len(), failed = report.failed.len(), threshold, "preloaded domains");
        report
    }

    /// Domains to search, in registration order.
    ///
    /// `None` or an empty filter selects every domain.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownDomain` for the first filter name that is not registered.
    pub fn resolve(&self, filter: Option<&[String]>) -> Result<Vec<Arc<Domain>>, Error> {
        match filter {
            None => Ok(self.domains.clone()),
            Some([]) => Ok(self.domains.clone()),
            Some(names) => {
                if let Some(unknown) = names.iter().find(|n| !self.index.contains_key(n.as_str())) {
                    return Err(Error::UnknownDomain(unknown.clone()));
                }
                Ok(self
                    .domains
                    .iter()
                    .filter(|d| names.iter().any(|n| n == d.name()))
                    .cloned()
                    .collect())
            }
        }
    }

    /// Search every target concurrently and wait for all of them.
    ///
    /// A domain that fails (or whose task panics) is logged and left out.
    pub async fn search_parallel(&self, query: &str, targets: &[Arc<Domain>]) -> FanOut {
        let mut join_set = JoinSet::new();
        for (position, domain) in targets.iter().enumerate() {
            let domain = Arc::clone(domain);
            let query = query.to_string();
            join_set.spawn(async move { (position, domain.search(&query).await) });
        }

        let mut collected: Vec<(usize, KnowledgeResult)> = Vec::new();
        let mut failed = 0;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((position, Ok(Some(mut result)))) => {
                    result.metadata.search_method = Some("parallel".into());
                    collected.push((position, result));
                }
                Ok((_, Ok(None))) => {}
                Ok((position, Err(e))) => {
                    failed += 1;
                    tracing::warn!(domain = %targets[position].name(), error = %e, "domain search failed, excluding");
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(error = %e, "domain search task panicked, excluding");
                }
            }
        }

        collected.sort_by_key(|(position, _)| *position);
        FanOut { results: collected.into_iter().map(|(_, r)| r).collect(), searched: targets.len(), failed }
    }

    /// Search targets one at a time, skipping any that fail.
    pub async fn search_sequential(&self, query: &str, targets: &[Arc<Domain>]) -> FanOut {
        let mut fan_out = FanOut { searched: targets.len(), ..Default::default() };
        for domain in targets {
            match domain.search(query).await {
                Ok(Some(mut result)) => {
                    result.metadata.search_method = Some("sequential".into());
                    fan_out.results.push(result);
                }
                Ok(None) => {}
                Err(e) => {
                    fan_out.failed += 1;
                    tracing::warn!(domain = %domain.name(), error = %e, "domain search failed, skipping");
                }
            }
        }
        fan_out
    }

    pub fn status(&self) -> Vec<DomainStatus> {
        self.domains
            .iter()
            .map(|d| DomainStatus { name: d.name().to_string(), weight: d.weight(), loaded: d.is_loaded() })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeSource;
    use async_trait::async_trait;

    struct Fixed {
        answer: Option<&'static str>,
        fail: bool,
    }

    #[async_trait]
    impl KnowledgeSource for Fixed {
        async fn search(&self, _query: &str) -> Result<Option<KnowledgeResult>, Error> {
            if self.fail {
                return Err(Error::Internal("index corrupted".into()));
            }
            Ok(self.answer.map(|a| KnowledgeResult::new(a, "", "test")))
        }
    }

    fn source(answer: Option<&'static str>, fail: bool) -> impl DomainLoader + 'static {
        move || -> Result<Arc<dyn KnowledgeSource>, Error> { Ok(Arc::new(Fixed { answer, fail })) }
    }

    fn failing_loader() -> impl DomainLoader + 'static {
        || -> Result<Arc<dyn KnowledgeSource>, Error> { Err(Error::Internal("module missing".into())) }
    }

    fn registry() -> DomainRegistry {
        let mut registry = DomainRegistry::new();
        registry.register("alpha", 9, source(Some("from alpha"), false)).unwrap();
        registry.register("broken", 8, source(None, true)).unwrap();
        registry.register("empty", 5, source(None, false)).unwrap();
        registry.register("omega", 3, source(Some("from omega"), false)).unwrap();
        registry
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = registry();
        let err = registry.register("alpha", 1, source(None, false)).unwrap_err();
        assert!(matches!(err, Error::DuplicateDomain(name) if name == "alpha"));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_resolve() {
        let registry = registry();
        assert_eq!(registry.resolve(None).unwrap().len(), 4);
        assert_eq!(registry.resolve(Some(Vec::<String>::new().as_slice())).unwrap().len(), 4);

        let filter = vec!["omega".to_string(), "alpha".to_string()];
        let names: Vec<String> =
            registry.resolve(Some(filter.as_slice())).unwrap().iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["alpha", "omega"]);

        let unknown = vec!["alpha".to_string(), "astrology".to_string()];
        assert!(matches!(registry.resolve(Some(unknown.as_slice())), Err(Error::UnknownDomain(n)) if n == "astrology"));
    }

    #[tokio::test]
    async fn test_parallel_excludes_failures_and_keeps_order() {
        let registry = registry();
        let targets = registry.resolve(None).unwrap();
        let fan_out = registry.search_parallel("anything", &targets).await;

        assert_eq!(fan_out.searched, 4);
        assert_eq!(fan_out.failed, 1);
        assert!(!fan_out.all_failed());
        let sources: Vec<&str> = fan_out.results.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["alpha", "omega"]);
        assert_eq!(fan_out.results[0].metadata.search_method.as_deref(), Some("parallel"));
    }

    #[tokio::test]
    async fn test_sequential_skips_failures() {
        let registry = registry();
        let targets = registry.resolve(None).unwrap();
        let fan_out = registry.search_sequential("anything", &targets).await;

        assert_eq!(fan_out.failed, 1);
        assert_eq!(fan_out.results.len(), 2);
        assert_eq!(fan_out.results[1].metadata.search_method.as_deref(), Some("sequential"));
    }

    #[tokio::test]
    async fn test_all_failed() {
        let mut registry = DomainRegistry::new();
        registry.register("a", 5, source(None, true)).unwrap();
        registry.register("b", 5, failing_loader()).unwrap();
        let targets = registry.resolve(None).unwrap();
        assert!(registry.search_parallel("q", &targets).await.all_failed());
    }

    #[tokio::test]
    async fn test_preload_high_priority() {
        let mut registry = registry();
        registry.register("unloadable", 10, failing_loader()).unwrap();

        let report = registry.preload_high_priority(7).await;
        assert_eq!(report.loaded, vec!["alpha", "broken"]);
        assert_eq!(report.failed, vec!["unloadable"]);

        let status = registry.status();
        let loaded: Vec<&str> = status.iter().filter(|s| s.loaded).map(|s| s.name.as_str()).collect();
        assert_eq!(loaded, vec!["alpha", "broken"]);
    }

    #[tokio::test]
    async fn test_ensure_loaded_unknown() {
        let registry = registry();
        assert!(matches!(registry.ensure_loaded("nope").await, Err(Error::UnknownDomain(_))));
        registry.ensure_loaded("omega").await.unwrap();
        assert!(registry.get("omega").unwrap().is_loaded());
    }
}
