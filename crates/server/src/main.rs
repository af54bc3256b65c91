//! Ardi server entry point.
//!
//! Serves the chat API over HTTP, or the same operations as MCP tools over
//! stdio, depending on `transport`. Logging goes to stderr so it never
//! interferes with the JSON-RPC protocol on stdout.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use ardi_core::config::{AppConfig, Transport};
use ardi_core::responses::TemplateResponses;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod envelope;
mod error;
mod handler;
mod rate_limit;
mod routes;
mod state;
mod tools;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let registry = ardi_domains::default_registry()?;
    let threshold = config.preload_weight_threshold;
    let transport = config.transport;
    let bind_addr = config.bind_addr.clone();

    let state = AppState::new(config, registry, Arc::new(TemplateResponses::new()));
    state.processor.registry().preload_high_priority(threshold).await;

    match transport {
        Transport::Http => serve_http(state, &bind_addr).await,
        Transport::Stdio => serve_stdio(state).await,
    }
}

async fn serve_http(state: AppState, bind_addr: &str) -> Result<()> {
    let addr: SocketAddr = bind_addr.parse().with_context(|| format!("invalid bind address {bind_addr}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "Starting ardi server on http transport");
    axum::serve(listener, routes::app_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("ardi server stopped");
    Ok(())
}

async fn serve_stdio(state: AppState) -> Result<()> {
    tracing::info!("Starting ardi server on stdio transport");

    let handler = handler::ArdiServer::new(state);
    let server = serve_server(handler, stdio()).await?;
    server.waiting().await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
