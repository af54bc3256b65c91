//! Request-level errors for the HTTP and MCP front ends.

use ardi_core::fallback::ErrorResponse;
use ardi_core::validation::ValidationError;
use axum::http::StatusCode;
use rmcp::model::{ErrorCode, ErrorData as McpError};
use serde_json::Value;

use crate::envelope::ErrorBody;

/// Errors surfaced to API callers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body is not a JSON object.
    #[error("INVALID_JSON: {0}")]
    InvalidJson(String),

    /// Payload failed validation.
    #[error("VALIDATION_FAILED: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// Client exceeded its request window.
    #[error("RATE_LIMITED: retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Processing failed and no fallback recovered.
    #[error("{}: {}", .0.code, .0.error)]
    Processing(ErrorResponse),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors.iter().map(|e| format!("{}: {}", e.field, e.message)).collect::<Vec<_>>().join("; ")
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::InvalidJson(_) => "INVALID_JSON",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Processing(response) => &response.code,
        }
    }

    /// Friendly message plus any field-level details.
    pub fn body(&self) -> ErrorBody {
        let (message, details) = match self {
            Self::InvalidJson(_) => ("Request body must be a JSON object with a \"message\" field.".to_string(), None),
            Self::Validation(errors) => {
                ("Please check your message and try again.".to_string(), serde_json::to_value(errors).ok())
            }
            Self::RateLimited { retry_after_secs } => {
                (format!("Too many messages. Please wait {retry_after_secs} seconds and try again."), None)
            }
            Self::Processing(response) => (response.error.clone(), response.details.clone().map(Value::String)),
        };
        ErrorBody { code: self.code().to_string(), message, details }
    }
}

impl From<ApiError> for McpError {
    fn from(err: ApiError) -> Self {
        let code = match &err {
            ApiError::InvalidJson(_) | ApiError::Validation(_) => -32602,
            ApiError::RateLimited { .. } => -32009,
            ApiError::Processing(_) => -32603,
        };
        let data = err.body().details;
        McpError { code: ErrorCode(code), message: err.to_string().into(), data }
    }
}
