use thiserror::Error;

/// Failure talking to one storefront backend source.
///
/// These never surface to the UI caller: the context aggregator logs them
/// and leaves the corresponding snapshot field absent.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("transport failure calling `{endpoint}`: {message}")]
    Transport { endpoint: &'static str, message: String },
    #[error("backend returned status {status_code} for `{endpoint}`")]
    Api { endpoint: &'static str, status_code: u16 },
    #[error("could not decode `{endpoint}` response: {message}")]
    Decode { endpoint: &'static str, message: String },
    #[error("`{endpoint}` requires authentication but the session has no token")]
    MissingAuth { endpoint: &'static str },
}

impl BackendError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Api { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::MissingAuth { endpoint } => endpoint,
        }
    }
}

/// Failure obtaining a completion from the generative endpoint.
///
/// Transport-class and shape-class failures are distinct variants so the
/// orchestrator can log cause-specific diagnostics, even though all of
/// them map to one user-facing apology.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GenerativeError {
    #[error("generative endpoint is not configured (no API key)")]
    NotConfigured,
    #[error("generative request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
    #[error("transport failure calling generative endpoint: {0}")]
    Transport(String),
    #[error("generative endpoint returned status {status_code}")]
    Api { status_code: u16 },
    #[error("generative response body could not be parsed: {0}")]
    MalformedResponse(String),
    #[error("generative response contained no completion text")]
    EmptyCompletion,
}

impl GenerativeError {
    /// Stable cause label for logs and telemetry.
    pub fn cause(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Timeout { .. } => "timeout",
            Self::Transport(_) => "transport",
            Self::Api { .. } => "api_status",
            Self::MalformedResponse(_) => "malformed_response",
            Self::EmptyCompletion => "empty_completion",
        }
    }

    /// True for 2xx-but-unusable responses, false for never-got-an-answer
    /// failures. Both classes get the same user-facing text.
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::MalformedResponse(_) | Self::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendError, GenerativeError};

    #[test]
    fn backend_error_reports_its_endpoint() {
        let err = BackendError::Api { endpoint: "/user/orders", status_code: 503 };
        assert_eq!(err.endpoint(), "/user/orders");
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn generative_causes_are_distinct_between_transport_and_shape() {
        let timeout = GenerativeError::Timeout { timeout_secs: 20 };
        let empty = GenerativeError::EmptyCompletion;
        assert_ne!(timeout.cause(), empty.cause());
        assert!(!timeout.is_shape_error());
        assert!(empty.is_shape_error());
    }

    #[test]
    fn malformed_response_is_a_shape_error() {
        let err = GenerativeError::MalformedResponse("missing `choices` array".to_string());
        assert!(err.is_shape_error());
        assert_eq!(err.cause(), "malformed_response");
    }
}
