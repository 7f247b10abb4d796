//! Error types for the nationalize.io client.
//!
//! # Design
//! Callers need to tell three situations apart: no response at all
//! (`Transport`), a response whose body did not have the expected shape
//! (`Decode`), and a response where the service rejected the request
//! (`Service`). The last two still carry the rate-limit headers of the
//! response, since a 429 is exactly when a caller wants to look at them.

use thiserror::Error;

use crate::types::RateLimit;

/// Failure inside the transport.
///
/// `response_headers` is set when the status line and headers arrived but the
/// body could not be read; the client then reports a `Decode` error with the
/// rate limit instead of a `Transport` error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub response_headers: Option<Vec<(String, String)>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response_headers: None,
        }
    }

    pub fn after_headers(message: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        Self {
            message: message.into(),
            response_headers: Some(headers),
        }
    }
}

/// Errors returned by `NationalizeClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response: bad URL, DNS, connection reset.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The response body did not decode into the expected JSON shape.
    #[error("decoding response failed: {message}")]
    Decode {
        message: String,
        rate_limit: RateLimit,
    },

    /// The service answered with a non-200 status and an `{"error": ...}` body.
    #[error("{message}")]
    Service {
        status: u16,
        message: String,
        rate_limit: RateLimit,
    },
}

impl ApiError {
    /// Rate-limit headers of the failing response, if one was received.
    pub fn rate_limit(&self) -> Option<&RateLimit> {
        match self {
            ApiError::Transport(_) => None,
            ApiError::Decode { rate_limit, .. } | ApiError::Service { rate_limit, .. } => {
                Some(rate_limit)
            }
        }
    }

    /// HTTP status of a service error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_service(&self) -> bool {
        matches!(self, ApiError::Service { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_displays_service_message() {
        let err = ApiError::Service {
            status: 401,
            message: "Invalid API key".to_string(),
            rate_limit: RateLimit::default(),
        };
        assert_eq!(err.to_string(), "Invalid API key");
        assert_eq!(err.status(), Some(401));
        assert!(err.rate_limit().is_some());
    }

    #[test]
    fn transport_error_has_no_rate_limit() {
        let err = ApiError::from(TransportError::new("connection refused"));
        assert!(err.rate_limit().is_none());
        assert!(err.status().is_none());
        assert_eq!(err.to_string(), "transport failed: connection refused");
    }
}
