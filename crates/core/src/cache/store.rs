//! In-memory response cache with per-entry expiry.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;

use super::hash::compute_cache_key;
use crate::knowledge::KnowledgeResult;

/// A cached result with its bookkeeping.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub result: KnowledgeResult,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub hit_count: u64,
    seq: u64,
}

impl CachedEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Cache counters for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CachedEntry>,
    next_seq: u64,
    hits: u64,
    misses: u64,
}

/// Response cache keyed by the hash of the normalized query.
///
/// Lookups never fail: absent and expired entries are both `None`.
#[derive(Debug)]
pub struct ResponseCache {
    inner: Mutex<Inner>,
    max_size: usize,
    default_ttl: Duration,
}

impl ResponseCache {
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self { inner: Mutex::new(Inner::default()), max_size: max_size.max(1), default_ttl }
    }

    /// Look up a query.
    ///
    /// Expired entries are removed on access. A hit bumps the entry's hit
    /// count and returns a copy annotated with `cache_hit`, `hit_count` and
    /// `cache_age_ms`.
    pub fn get(&self, query: &str) -> Option<KnowledgeResult> {
        let key = compute_cache_key(query);
        let now = Utc::now();
        let mut inner = self.inner.lock();

        let expired = match inner.entries.get(&key) {
            None => {
                inner.misses += 1;
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            inner.entries.remove(&key);
            inner.misses += 1;
            tracing::debug!(key = %key, "evicted expired cache entry");
            return None;
        }

        inner.hits += 1;
        let entry = inner.entries.get_mut(&key)?;
        entry.hit_count += 1;

        let mut result = entry.result.clone();
        result.metadata.cache_hit = true;
        result.metadata.hit_count = Some(entry.hit_count);
        result.metadata.cache_age_ms = Some((now - entry.created_at).num_milliseconds());
        Some(result)
    }

    /// Store a result under the default TTL.
    pub fn put(&self, query: &str, result: KnowledgeResult) {
        self.put_with_ttl(query, result, self.default_ttl);
    }

    /// Store a result with an explicit TTL.
    ///
    /// When the cache is full, the oldest tenth of the entries (at least one)
    /// is evicted first.
    pub fn put_with_ttl(&self, query: &str, result: KnowledgeResult, ttl: Duration) {
        let key = compute_cache_key(query);
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut inner = self.inner.lock();
        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.max_size {
            let evicted = evict_oldest(&mut inner.entries, self.max_size);
            tracing::debug!(evicted, "cache full, evicted oldest entries");
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .entries
            .insert(key, CachedEntry { result, created_at: now, expires_at, hit_count: 0, seq });
    }

    /// Remove every entry whose content, category or source matches `pattern`.
    ///
    /// Returns the number of removed entries.
    pub fn invalidate_by_pattern(&self, pattern: &Regex) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| {
            let r = &entry.result;
            !(pattern.is_match(&r.content) || pattern.is_match(&r.category) || pattern.is_match(&r.source))
        });
        before - inner.entries.len()
    }

    /// Remove every expired entry. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired(now));
        before - inner.entries.len()
    }

    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a query currently has an entry (expired or not).
    pub fn contains(&self, query: &str) -> bool {
        self.inner.lock().entries.contains_key(&compute_cache_key(query))
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let lookups = inner.hits + inner.misses;
        CacheStats {
            size: inner.entries.len(),
            max_size: self.max_size,
            hits: inner.hits,
            misses: inner.misses,
            hit_rate: if lookups == 0 { 0.0 } else { inner.hits as f64 / lookups as f64 },
        }
    }
}

/// Evict the oldest `ceil(max_size / 10)` entries by creation time.
fn evict_oldest(entries: &mut HashMap<String, CachedEntry>, max_size: usize) -> usize {
    let count = max_size.div_ceil(10).max(1);

    let mut by_age: Vec<(DateTime<Utc>, u64, String)> =
        entries.iter().map(|(k, e)| (e.created_at, e.seq, k.clone())).collect();
    by_age.sort();

    let mut evicted = 0;
    for (_, _, key) in by_age.into_iter().take(count) {
        entries.remove(&key);
        evicted += 1;
    }
    evicted
}
