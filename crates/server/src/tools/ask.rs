//! ardi_ask tool implementation.
//!
//! Answers a question the same way `POST /api/chat` does, minus rate limiting.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::state::AppState;

/// Parameters for the ardi_ask tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AskParams {
    /// The question to answer.
    pub message: String,

    /// Restrict the search to these domains. Defaults to all of them.
    pub domains: Option<Vec<String>>,

    /// Set to false to skip the response cache.
    pub use_cache: Option<bool>,
}

/// Implementation of the ardi_ask tool.
pub async fn ask_impl(state: &AppState, params: AskParams) -> Result<CallToolResult, McpError> {
    let mut options = state.default_options();
    options.domains = params.domains.filter(|d| !d.is_empty());
    if let Some(use_cache) = params.use_cache {
        options.use_cache = use_cache;
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let answer = state.ask(&json!({ "message": params.message }), &options, &request_id).await?;
    super::json_result(&answer)
}
