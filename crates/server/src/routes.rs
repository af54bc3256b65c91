//! HTTP routes.
//!
//! - `POST /api/chat` answers a `{ "message": ... }` payload
//! - `GET  /api/chat` returns health and statistics

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::envelope::{Envelope, EnvelopeMetadata, VERSION};
use crate::error::ApiError;
use crate::rate_limit::client_id;
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", get(chat_health).post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn metadata(started: Instant, request_id: String) -> EnvelopeMetadata {
    EnvelopeMetadata { processing_time: started.elapsed().as_millis() as u64, version: VERSION, request_id }
}

fn success<T: Serialize>(data: T, started: Instant, request_id: String) -> Response {
    (StatusCode::OK, Json(Envelope::ok(data, metadata(started, request_id)))).into_response()
}

fn failure(err: &ApiError, started: Instant, request_id: String) -> Response {
    let envelope = Envelope::<()>::err(err.body(), metadata(started, request_id));
    let mut response = (err.status(), Json(envelope)).into_response();
    if let ApiError::RateLimited { retry_after_secs } = err
        && let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string())
    {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}

/// POST /api/chat
///
/// Rate limit, then parse, then validate, then answer.
async fn chat(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let started = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    match answer(&state, &headers, &body, &request_id).await {
        Ok(result) => success(result, started, request_id),
        Err(err) => {
            tracing::warn!(request_id = %request_id, error = %err, "chat request failed");
            failure(&err, started, request_id)
        }
    }
}

async fn answer(
    state: &AppState, headers: &HeaderMap, body: &[u8], request_id: &str,
) -> Result<ardi_core::KnowledgeResult, ApiError> {
    let client = client_id(headers);
    let decision = state.limiter.check(&client);
    if !decision.allowed {
        return Err(ApiError::RateLimited { retry_after_secs: decision.reset_in.as_secs().max(1) });
    }
    tracing::debug!(client = %client, remaining = decision.remaining, "rate limit check passed");

    let payload: Value = serde_json::from_slice(body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;
    if !payload.is_object() {
        return Err(ApiError::InvalidJson("expected a JSON object".into()));
    }

    state.ask(&payload, &state.default_options(), request_id).await
}

/// GET /api/chat
async fn chat_health(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    success(state.health(), started, uuid::Uuid::new_v4().to_string())
}
