//! Response cache for processed queries.
//!
//! Entries live in process memory only and are keyed by the SHA-256 of the
//! normalized query, so "What is LOR?" and "what is lor" share an entry.
//! It supports:
//!
//! - Per-entry TTL, purged lazily on lookup
//! - Oldest-first eviction of a tenth of the entries when full
//! - Invalidation by regex over content, category and source

pub mod hash;
pub mod store;

pub use hash::{compute_cache_key, normalize_query};
pub use store::{CacheStats, CachedEntry, ResponseCache};
