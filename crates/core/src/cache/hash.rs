//! Normalized query cache key generation.

use sha2::{Digest, Sha256};

/// Normalize a query for cache lookups and keyword matching.
///
/// Lower-cases, drops everything that is not alphanumeric or whitespace, and
/// collapses whitespace runs to single spaces.
pub fn normalize_query(query: &str) -> String {
    let stripped: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compute the cache key for a query: SHA-256 of its normalized form.
pub fn compute_cache_key(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_query(query).as_bytes());
    hex::encode(hasher.finalize())
}
