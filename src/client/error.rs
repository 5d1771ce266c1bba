//! API failure classification
//!
//! Responses are classified by status code: `104` and `5xx` are worth
//! retrying, `4xx` are not. Transport-level failures (connection resets,
//! timeouts) are retriable as well.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{status} Client Error: {reason} for path: {path}")]
    Fatal {
        status: u16,
        reason: String,
        path: String,
    },

    #[error("{status} Server Error: {reason} for path: {path}")]
    Retriable {
        status: u16,
        reason: String,
        path: String,
    },

    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Whether the request that produced this error may be sent again
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Fatal { .. } => false,
            Self::Retriable { .. } => true,
            Self::Transport { source, .. } => !source.is_builder() && !source.is_decode(),
        }
    }

    /// HTTP status code, when the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fatal { status, .. } | Self::Retriable { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
        }
    }
}

/// Classify a response status
///
/// # Errors
/// Returns [`ApiError::Retriable`] for `104` and `500..=599`, and
/// [`ApiError::Fatal`] for `400..=499`. Every other status passes.
pub fn classify_status(status: u16, reason: &str, path: &str) -> Result<(), ApiError> {
    match status {
        104 | 500..=599 => Err(ApiError::Retriable {
            status,
            reason: reason.to_string(),
            path: path.to_string(),
        }),
        400..=499 => Err(ApiError::Fatal {
            status,
            reason: reason.to_string(),
            path: path.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes() {
        assert!(classify_status(200, "OK", "/products/mine").is_ok());
        assert!(classify_status(204, "No Content", "/products/mine").is_ok());
    }

    #[test]
    fn test_client_errors_fatal() {
        for status in [400, 401, 403, 404, 429, 499] {
            let err = classify_status(status, "Client Error", "/products/mine").unwrap_err();
            assert!(!err.is_retriable(), "{} should be fatal", status);
            assert_eq!(err.status(), Some(status));
        }
    }

    #[test]
    fn test_server_errors_retriable() {
        for status in [500, 502, 503, 504, 599] {
            let err = classify_status(status, "Server Error", "/reports/subscriptions").unwrap_err();
            assert!(err.is_retriable(), "{} should be retriable", status);
        }
    }

    #[test]
    fn test_connection_reset_status_retriable() {
        let err = classify_status(104, "Connection reset by peer", "/reports/subscriptions")
            .unwrap_err();
        assert!(err.is_retriable());
    }

    #[test]
    fn test_messages() {
        let err = classify_status(401, "Unauthorized", "/products/mine").unwrap_err();
        assert_eq!(
            err.to_string(),
            "401 Client Error: Unauthorized for path: /products/mine"
        );

        let err = classify_status(503, "Service Unavailable", "/products/mine").unwrap_err();
        assert_eq!(
            err.to_string(),
            "503 Server Error: Service Unavailable for path: /products/mine"
        );
    }
}
