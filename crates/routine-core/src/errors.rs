use std::time::Duration;

/// Failure to obtain a reply from the chat service.
#[derive(Clone, Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("server error {status}: {body}")]
    ServerError { status: u16, body: String },
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    #[error("no response configured")]
    Exhausted,
}

impl TransportError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::RateLimited => "rate_limited",
            Self::ServerError { .. } => "server_error",
            Self::NetworkError(_) => "network_error",
            Self::Timeout(_) => "timeout",
            Self::Exhausted => "exhausted",
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::AuthenticationFailed(body),
            429 => Self::RateLimited,
            500..=599 => Self::ServerError { status, body },
            _ => Self::InvalidRequest(format!("unexpected status {status}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_mapping() {
        assert!(matches!(TransportError::from_status(401, "no".into()), TransportError::AuthenticationFailed(_)));
        assert!(matches!(TransportError::from_status(403, "no".into()), TransportError::AuthenticationFailed(_)));
        assert!(matches!(TransportError::from_status(429, String::new()), TransportError::RateLimited));
        assert!(matches!(
            TransportError::from_status(502, "bad gateway".into()),
            TransportError::ServerError { status: 502, .. }
        ));
        assert!(matches!(TransportError::from_status(400, "bad".into()), TransportError::InvalidRequest(_)));
        assert!(matches!(TransportError::from_status(404, "gone".into()), TransportError::InvalidRequest(_)));
    }

    #[test]
    fn error_kind_strings() {
        assert_eq!(TransportError::RateLimited.error_kind(), "rate_limited");
        assert_eq!(TransportError::NetworkError("x".into()).error_kind(), "network_error");
        assert_eq!(TransportError::Timeout(Duration::from_secs(1)).error_kind(), "timeout");
    }

    #[test]
    fn display_includes_detail() {
        let err = TransportError::ServerError { status: 500, body: "boom".into() };
        assert_eq!(err.to_string(), "server error 500: boom");
    }
}
