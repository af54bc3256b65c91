//! Query pipeline: cache, domain fan-out, ranking, and fallback.

use std::sync::Arc;

use super::{DomainRegistry, KnowledgeResult};
use crate::Error;
use crate::cache::{ResponseCache, normalize_query};
use crate::config::AppConfig;
use crate::fallback::{ErrorContext, ErrorHandler, ErrorResponse};
use crate::perf::{PerformanceMonitor, SampleExtra};
use crate::responses::ResponseProvider;

/// Operation name used for timing samples and error records.
pub const PROCESS_QUERY_OPERATION: &str = "knowledge.process_query";

/// `ErrorContext` metadata key holding the caller's domain filter.
pub const DOMAIN_FILTER_KEY: &str = "domains";

/// Per-call knobs for [`KnowledgeProcessor::process_query`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub max_results: usize,
    pub min_confidence: f64,
    /// Domains to search; `None` searches all of them.
    pub domains: Option<Vec<String>>,
    /// Ignored while a non-empty `domains` filter is set.
    pub use_cache: bool,
    pub parallel: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { max_results: 3, min_confidence: 0.1, domains: None, use_cache: true, parallel: true }
    }
}

impl QueryOptions {
    /// The non-empty domain filter, if any.
    pub fn domain_filter(&self) -> Option<&[String]> {
        self.domains.as_deref().filter(|d| !d.is_empty())
    }

    /// Cache entries are keyed by query alone, so filtered queries bypass them.
    pub fn caches(&self) -> bool {
        self.use_cache && self.domain_filter().is_none()
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_results: config.max_results,
            min_confidence: config.min_confidence,
            domains: None,
            use_cache: true,
            parallel: config.parallel_search,
        }
    }
}

/// Drop results below `min_confidence`, order the rest by confidence
/// (highest first, ties in input order) and keep at most `max_results`.
pub fn rank_results(
    results: Vec<KnowledgeResult>, min_confidence: f64, max_results: usize, unscored: f64,
) -> Vec<KnowledgeResult> {
    let mut kept: Vec<KnowledgeResult> =
        results.into_iter().filter(|r| r.effective_confidence(unscored) >= min_confidence).collect();
    kept.sort_by(|a, b| b.effective_confidence(unscored).total_cmp(&a.effective_confidence(unscored)));
    kept.truncate(max_results);
    kept
}

/// Answers user questions from the registered domains.
pub struct KnowledgeProcessor {
    registry: Arc<DomainRegistry>,
    cache: Arc<ResponseCache>,
    monitor: Arc<PerformanceMonitor>,
    errors: Arc<ErrorHandler>,
    unscored_confidence: f64,
}

impl KnowledgeProcessor {
    pub fn new(
        registry: Arc<DomainRegistry>, cache: Arc<ResponseCache>, monitor: Arc<PerformanceMonitor>,
        errors: Arc<ErrorHandler>,
    ) -> Self {
        Self { registry, cache, monitor, errors, unscored_confidence: 1.0 }
    }

    /// Confidence assumed for results whose source does not score them.
    pub fn with_unscored_confidence(mut self, unscored: f64) -> Self {
        self.unscored_confidence = unscored.clamp(0.0, 1.0);
        self
    }

    /// Build the processor and its collaborators from configuration, with
    /// the default fallback strategies registered.
    pub fn from_config(
        config: &AppConfig, registry: Arc<DomainRegistry>, responses: Arc<dyn ResponseProvider>,
    ) -> Self {
        let defaults = QueryOptions::from_config(config);
        let cache = Arc::new(ResponseCache::new(config.cache_max_size, config.cache_ttl()));
        let monitor = Arc::new(PerformanceMonitor::new(config.perf_max_history));
        let errors = Arc::new(ErrorHandler::with_default_strategies(
            config.error_log_size,
            config.development,
            Arc::clone(&registry),
            responses,
            &defaults,
            config.unscored_confidence,
        ));
        Self::new(registry, cache, monitor, errors).with_unscored_confidence(config.unscored_confidence)
    }

    pub fn registry(&self) -> &Arc<DomainRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn monitor(&self) -> &Arc<PerformanceMonitor> {
        &self.monitor
    }

    pub fn errors(&self) -> &Arc<ErrorHandler> {
        &self.errors
    }

    /// Best answer for `query`, or `None` when no domain matched.
    ///
    /// Failures are routed through the fallback chain; the caller only sees
    /// an `ErrorResponse` when every strategy gave up.
    pub async fn process_query(
        &self, query: &str, options: &QueryOptions,
    ) -> Result<Option<KnowledgeResult>, ErrorResponse> {
        self.process_query_for(query, options, None).await
    }

    /// Like [`process_query`](Self::process_query), tagging errors with the
    /// caller's request id.
    pub async fn process_query_for(
        &self, query: &str, options: &QueryOptions, request_id: Option<&str>,
    ) -> Result<Option<KnowledgeResult>, ErrorResponse> {
        match self.try_process(query, options).await {
            Ok(result) => Ok(result),
            Err(e) => {
                let mut context = ErrorContext::new(PROCESS_QUERY_OPERATION)
                    .with_user_message(query)
                    .with_metadata("parallel", options.parallel.into())
                    .with_metadata("useCache", options.caches().into());
                if let Some(filter) = options.domain_filter() {
                    context = context.with_metadata(DOMAIN_FILTER_KEY, filter.to_vec().into());
                }
                if let Some(id) = request_id {
                    context = context.with_request_id(id);
                }
                self.errors.handle_error(&e, &context).await.map(Some)
            }
        }
    }

    async fn try_process(&self, query: &str, options: &QueryOptions) -> Result<Option<KnowledgeResult>, Error> {
        let timer = self.monitor.start_timer(PROCESS_QUERY_OPERATION);

        let caches = options.caches();
        if caches
            && let Some(cached) = self.cache.get(query)
        {
            timer.stop(SampleExtra {
                cache_hit: true,
                domains_searched: 0,
                results_found: 1,
                confidence: cached.confidence,
            });
            tracing::debug!(hit_count = ?cached.metadata.hit_count, "served query from cache");
            return Ok(Some(cached));
        }

        let (ranked, searched) = match self.search_and_rank(query, options).await {
            Ok(found) => found,
            Err(e) => {
                timer.stop(SampleExtra::default());
                return Err(e);
            }
        };

        let top = ranked.into_iter().next();
        let elapsed = timer.stop(SampleExtra {
            cache_hit: false,
            domains_searched: searched,
            results_found: usize::from(top.is_some()),
            confidence: top.as_ref().and_then(|r| r.confidence),
        });

        let Some(mut result) = top else {
            tracing::debug!(domains = searched, "no domain matched query");
            return Ok(None);
        };

        result.metadata.processing_time_ms = Some(elapsed.round() as u64);
        result.metadata.cache_hit = false;
        result.metadata.domains_searched = Some(searched);

        if caches {
            self.cache.put(query, result.clone());
        }

        Ok(Some(result))
    }

    async fn search_and_rank(
        &self, query: &str, options: &QueryOptions,
    ) -> Result<(Vec<KnowledgeResult>, usize), Error> {
        if normalize_query(query).is_empty() {
            return Err(Error::InvalidInput("query has no searchable text".into()));
        }

        let targets = self.registry.resolve(options.domain_filter())?;
        let fan_out = if options.parallel {
            self.registry.search_parallel(query, &targets).await
        } else {
            self.registry.search_sequential(query, &targets).await
        };

        if fan_out.all_failed() {
            return Err(Error::DomainsUnavailable(format!("all {} searched domains failed", fan_out.searched)));
        }

        let searched = fan_out.searched;
        let ranked =
            rank_results(fan_out.results, options.min_confidence, options.max_results, self.unscored_confidence);
        Ok((ranked, searched))
    }
}
