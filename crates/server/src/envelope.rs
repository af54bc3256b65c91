//! JSON envelope wrapped around every HTTP response.

use serde::Serialize;
use serde_json::Value;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeMetadata {
    /// Milliseconds spent handling the request.
    pub processing_time: u64,
    pub version: &'static str,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// `{ success, data | error, metadata }`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub metadata: EnvelopeMetadata,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, metadata: EnvelopeMetadata) -> Self {
        Self { success: true, data: Some(data), error: None, metadata }
    }

    pub fn err(error: ErrorBody, metadata: EnvelopeMetadata) -> Self {
        Self { success: false, data: None, error: Some(error), metadata }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> EnvelopeMetadata {
        EnvelopeMetadata { processing_time: 4, version: VERSION, request_id: "req-1".into() }
    }

    #[test]
    fn test_success_shape() {
        let json = serde_json::to_value(Envelope::ok(serde_json::json!({"answer": 1}), metadata())).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["answer"], 1);
        assert!(json.get("error").is_none());
        assert_eq!(json["metadata"]["processingTime"], 4);
        assert_eq!(json["metadata"]["requestId"], "req-1");
    }

    #[test]
    fn test_error_shape() {
        let body = ErrorBody { code: "RATE_LIMITED".into(), message: "slow down".into(), details: None };
        let json = serde_json::to_value(Envelope::<()>::err(body, metadata())).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "RATE_LIMITED");
        assert!(json["error"].get("details").is_none());
    }
}
