//! Unified error types for ardi.
//!
//! Every variant displays with a stable machine code prefix so log lines and
//! error responses can be grepped by code.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the knowledge service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A domain name that was never registered.
    #[error("UNKNOWN_DOMAIN: {0}")]
    UnknownDomain(String),

    /// A domain with the same name is already registered.
    #[error("DUPLICATE_DOMAIN: {0}")]
    DuplicateDomain(String),

    /// Loading a domain's knowledge source failed.
    #[error("DOMAIN_LOAD_FAILED: {domain}: {reason}")]
    DomainLoad { domain: String, reason: String },

    /// A loaded domain failed while searching.
    #[error("DOMAIN_SEARCH_FAILED: {domain}: {reason}")]
    DomainSearch { domain: String, reason: String },

    /// Every domain in a fan-out failed.
    #[error("DOMAINS_UNAVAILABLE: {0}")]
    DomainsUnavailable(String),

    /// A knowledge source timed out.
    #[error("TIMEOUT: {0}")]
    Timeout(String),

    /// A knowledge source could not reach its backend.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// A fallback strategy could not produce a response.
    #[error("FALLBACK_FAILED: {0}")]
    FallbackFailed(String),

    /// Anything else that went wrong while processing a query.
    #[error("INTERNAL_ERROR: {0}")]
    Internal(String),
}

impl Error {
    /// The machine code this error displays with.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::UnknownDomain(_) => "UNKNOWN_DOMAIN",
            Error::DuplicateDomain(_) => "DUPLICATE_DOMAIN",
            Error::DomainLoad { .. } => "DOMAIN_LOAD_FAILED",
            Error::DomainSearch { .. } => "DOMAIN_SEARCH_FAILED",
            Error::DomainsUnavailable(_) => "DOMAINS_UNAVAILABLE",
            Error::Timeout(_) => "TIMEOUT",
            Error::Network(_) => "NETWORK_ERROR",
            Error::FallbackFailed(_) => "FALLBACK_FAILED",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error came out of the knowledge domain layer.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            Error::DomainLoad { .. } | Error::DomainSearch { .. } | Error::DomainsUnavailable(_)
        )
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::UnknownDomain(_) => -32001,
            Error::DuplicateDomain(_) => -32002,
            Error::DomainLoad { .. } => -32003,
            Error::DomainSearch { .. } => -32004,
            Error::DomainsUnavailable(_) => -32005,
            Error::Timeout(_) => -32006,
            Error::Network(_) => -32007,
            Error::FallbackFailed(_) => -32008,
            Error::Internal(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownDomain("astrology".to_string());
        assert!(err.to_string().contains("UNKNOWN_DOMAIN"));
        assert!(err.to_string().contains("astrology"));
    }

    #[test]
    fn test_code_matches_display_prefix() {
        let err = Error::DomainLoad { domain: "insurance".into(), reason: "boom".into() };
        assert!(err.to_string().starts_with(err.code()));
        assert_eq!(err.to_string(), "DOMAIN_LOAD_FAILED: insurance: boom");
    }

    #[test]
    fn test_is_domain_error() {
        assert!(Error::DomainsUnavailable("all".into()).is_domain_error());
        assert!(!Error::Timeout("slow".into()).is_domain_error());
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::InvalidInput("empty query".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
        assert!(mcp_err.message.contains("empty query"));
    }
}
