//! Knowledge domains and their lazily loaded sources.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, OnceCell};

use super::KnowledgeResult;
use crate::Error;

/// A searchable body of knowledge.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Best match for `query`, or `None` when nothing matches.
    async fn search(&self, query: &str) -> Result<Option<KnowledgeResult>, Error>;
}

/// Produces a domain's [`KnowledgeSource`] on first use.
#[async_trait]
pub trait DomainLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn KnowledgeSource>, Error>;
}

#[async_trait]
impl<F> DomainLoader for F
where
    F: Fn() -> Result<Arc<dyn KnowledgeSource>, Error> + Send + Sync,
{
    async fn load(&self) -> Result<Arc<dyn KnowledgeSource>, Error> {
        self()
    }
}

/// A named knowledge domain.
///
/// Starts unloaded. Concurrent callers share one in-flight load and all get
/// its outcome, success or failure. A failed load leaves the domain unloaded
/// so the next call after it retries.
pub struct Domain {
    name: String,
    weight: u8,
    loader: Arc<dyn DomainLoader>,
    source: OnceCell<Arc<dyn KnowledgeSource>>,
    /// Completed failed attempts; read before queueing on `last_failure`.
    failures: AtomicU64,
    last_failure: Mutex<Option<Error>>,
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Domain")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl Domain {
    pub fn new(name: impl Into<String>, weight: u8, loader: Arc<dyn DomainLoader>) -> Self {
        Self {
            name: name.into(),
            weight,
            loader,
            source: OnceCell::new(),
            failures: AtomicU64::new(0),
            last_failure: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Preload priority; higher loads earlier.
    pub fn weight(&self) -> u8 {
        self.weight
    }

    pub fn is_loaded(&self) -> bool {
        self.source.initialized()
    }

    /// Load the source if it is not loaded yet.
    ///
    /// A caller that queued behind an attempt which then failed gets that
    /// attempt's error instead of starting another load.
    pub async fn ensure_loaded(&self) -> Result<Arc<dyn KnowledgeSource>, Error> {
        if let Some(source) = self.source.get() {
            return Ok(Arc::clone(source));
        }

        let seen = self.failures.load(Ordering::Acquire);
        let mut last_failure = self.last_failure.lock().await;

        if let Some(source) = self.source.get() {
            return Ok(Arc::clone(source));
        }
        if self.failures.load(Ordering::Acquire) != seen
            && let Some(e) = last_failure.as_ref()
        {
            return Err(e.clone());
        }

        tracing::debug!(domain = %self.name, "loading knowledge domain");
        match self.loader.load().await {
            Ok(source) => {
                let _ = self.source.set(Arc::clone(&source));
                *last_failure = None;
                Ok(source)
            }
            Err(e) => {
                let e = match e {
                    Error::DomainLoad { .. } => e,
                    other => Error::DomainLoad { domain: self.name.clone(), reason: other.to_string() },
                };
                *last_failure = Some(e.clone());
                self.failures.fetch_add(1, Ordering::AcqRel);
                Err(e)
            }
        }
    }

    /// Search this domain, loading it first if needed.
    ///
    /// A result with no `source` is attributed to this domain.
    pub async fn search(&self, query: &str) -> Result<Option<KnowledgeResult>, Error> {
        let source = self.ensure_loaded().await?;
        let found = source.search(query).await.map_err(|e| match e {
            Error::DomainSearch { .. } => e,
            other => Error::DomainSearch { domain: self.name.clone(), reason: other.to_string() },
        })?;

        Ok(found.map(|mut result| {
            if result.source.is_empty() {
                result.source = self.name.clone();
            }
            result
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct Echo;

    #[async_trait]
    impl KnowledgeSource for Echo {
        async fn search(&self, query: &str) -> Result<Option<KnowledgeResult>, Error> {
            Ok(Some(KnowledgeResult::new(query, "", "echo")))
        }
    }

    struct SlowCountingLoader {
        calls: Arc<AtomicUsize>,
        /// Calls numbered below this fail.
        fail_calls: usize,
    }

    #[async_trait]
    impl DomainLoader for SlowCountingLoader {
        async fn load(&self) -> Result<Arc<dyn KnowledgeSource>, Error> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if call < self.fail_calls {
                return Err(Error::Internal("disk hiccup".into()));
            }
            Ok(Arc::new(Echo))
        }
    }

    #[tokio::test]
    async fn test_search_loads_and_attributes_source() {
        let loader = || -> Result<Arc<dyn KnowledgeSource>, Error> { Ok(Arc::new(Echo)) };
        let domain = Domain::new("echo", 5, Arc::new(loader));
        assert!(!domain.is_loaded());

        let result = domain.search("hello").await.unwrap().unwrap();
        assert!(domain.is_loaded());
        assert_eq!(result.source, "echo");
        assert_eq!(result.content, "hello");
    }

    #[tokio::test]
    async fn test_concurrent_loads_are_coalesced() {
        let calls = Arc::new(AtomicUsize::new(0));
        let domain =
            Arc::new(Domain::new("slow", 9, Arc::new(SlowCountingLoader { calls: calls.clone(), fail_calls: 0 })));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let domain = domain.clone();
                tokio::spawn(async move { domain.ensure_loaded().await.is_ok() })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let domain = Domain::new("flaky", 9, Arc::new(SlowCountingLoader { calls: calls.clone(), fail_calls: 1 }));

        let err = domain.ensure_loaded().await.err().unwrap();
        assert!(matches!(err, Error::DomainLoad { ref domain, .. } if domain == "flaky"));
        assert!(!domain.is_loaded());

        assert!(domain.ensure_loaded().await.is_ok());
        assert!(domain.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_failed_load_is_shared() {
        let calls = Arc::new(AtomicUsize::new(0));
        let domain = Arc::new(Domain::new(
            "down",
            9,
            Arc::new(SlowCountingLoader { calls: calls.clone(), fail_calls: usize::MAX }),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let domain = domain.clone();
                tokio::spawn(async move { domain.ensure_loaded().await.err() })
            })
            .collect();
        for handle in handles {
            let err = handle.await.unwrap().unwrap();
            assert!(matches!(err, Error::DomainLoad { ref domain, .. } if domain == "down"));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!domain.is_loaded());

        assert!(domain.ensure_loaded().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
