//! ardi_stats tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};

use crate::state::AppState;

/// Same report as `GET /api/chat`.
pub async fn stats_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    super::json_result(&state.health())
}
