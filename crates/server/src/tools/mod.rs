//! MCP tool implementations.
//!
//! This module contains all tools exposed by the Ardi MCP server.

pub mod ask;
pub mod cache_invalidate;
pub mod stats;

pub use ask::{AskParams, ask_impl};
pub use cache_invalidate::{CacheInvalidateParams, invalidate_impl};
pub use stats::stats_impl;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Serialize `output` as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| ardi_core::Error::Internal(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) fn text_of(result: &CallToolResult) -> serde_json::Value {
    let content = serde_json::to_value(&result.content[0]).unwrap();
    let text = content.get("text").and_then(|v| v.as_str()).expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
