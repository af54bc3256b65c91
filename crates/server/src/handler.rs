//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::state::AppState;
use crate::tools::{AskParams, CacheInvalidateParams, ask_impl, invalidate_impl, stats_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The MCP server handler for Ardi.
#[derive(Clone)]
pub struct ArdiServer {
    state: AppState,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ArdiServer {
    pub fn new(state: AppState) -> Self {
        Self { state, tool_router: Self::tool_router() }
    }

    /// Answer a question from the knowledge domains.
    #[tool(
        description = "Answer a question about insurance, the injury claim process, medical treatment, settlements, \
                       or the firm. Returns JSON with the answer, its source and confidence."
    )]
    async fn ardi_ask(&self, params: Parameters<AskParams>) -> Result<CallToolResult, McpError> {
        ask_impl(&self.state, params.0).await
    }

    /// Report performance, cache, domain and error statistics.
    #[tool(description = "Report health and statistics: query timings, cache hit rate, domains, and recent errors.")]
    async fn ardi_stats(&self) -> Result<CallToolResult, McpError> {
        stats_impl(&self.state).await
    }

    /// Drop cached answers.
    #[tool(
        description = "Remove cached answers whose content, category, or source matches a regex. Clears the whole \
                       cache when no pattern is given. Expired entries are always purged."
    )]
    async fn ardi_cache_invalidate(
        &self, params: Parameters<CacheInvalidateParams>,
    ) -> Result<CallToolResult, McpError> {
        invalidate_impl(&self.state, params.0).await
    }
}

impl ServerHandler for ArdiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "ardi".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::state;

    #[test]
    fn test_tools_listed() {
        let server = ArdiServer::new(state());
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["ardi_ask", "ardi_cache_invalidate", "ardi_stats"]);
    }

    #[test]
    fn test_server_info() {
        let info = ArdiServer::new(state()).get_info();
        assert_eq!(info.server_info.name, "ardi");
    }
}
