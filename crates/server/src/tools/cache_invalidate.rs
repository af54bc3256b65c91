//! ardi_cache_invalidate tool implementation.
//!
//! Drops cached answers whose content, category or source matches a regex,
//! after purging entries past their TTL.

use regex::Regex;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Parameters for the ardi_cache_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateParams {
    /// Regular expression matched against cached answers. Omit to clear the cache.
    pub pattern: Option<String>,
}

/// Output from the ardi_cache_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheInvalidateOutput {
    /// Number of live entries removed.
    pub removed: usize,
    /// Number of expired entries purged before matching.
    pub expired: usize,
}

/// Implementation of the ardi_cache_invalidate tool.
pub async fn invalidate_impl(state: &AppState, params: CacheInvalidateParams) -> Result<CallToolResult, McpError> {
    let cache = state.processor.cache();
    let pattern = params
        .pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|e| ardi_core::Error::InvalidInput(format!("Invalid pattern: {e}")))?;

    let expired = cache.purge_expired();
    let removed = match pattern {
        Some(regex) => cache.invalidate_by_pattern(&regex),
        None => {
            let removed = cache.len();
            cache.clear();
            removed
        }
    };

    tracing::info!(removed, expired, pattern = ?params.pattern, "invalidated cached answers");
    super::json_result(&CacheInvalidateOutput { removed, expired })
}
