//! Failures of a model call

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Why a completion could not be obtained
#[derive(Error, Debug)]
pub enum LLMError {
    /// The provider could not be built (missing API key, bad client settings)
    #[error("Provider misconfigured: {0}")]
    Configuration(String),

    /// The request never got an HTTP response
    #[cfg(feature = "anthropic")]
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 401
    #[error("API key rejected")]
    AuthenticationFailed,

    /// HTTP 429
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// HTTP 400
    #[error("Request rejected: {0}")]
    InvalidRequest(String),

    /// HTTP 404 for the requested model
    #[error("Unknown model: {0}")]
    ModelNotFound(String),

    /// Any other non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// A success response whose body could not be decoded
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A scripted provider was called more often than it has replies
    #[error("Scripted provider has no replies left")]
    ScriptExhausted,
}

impl LLMError {
    /// Classify a non-success response for `model`
    pub fn from_status(status: u16, body: String, model: &str) -> Self {
        match status {
            400 => Self::InvalidRequest(body),
            401 => Self::AuthenticationFailed,
            404 => Self::ModelNotFound(model.to_string()),
            429 => Self::RateLimited(body),
            _ => Self::Status { status, body },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            LLMError::from_status(401, String::new(), "m"),
            LLMError::AuthenticationFailed
        ));
        assert_eq!(
            LLMError::from_status(404, "not_found_error".to_string(), "claude-x").to_string(),
            "Unknown model: claude-x"
        );
        assert_eq!(
            LLMError::from_status(429, "slow down".to_string(), "m").to_string(),
            "Rate limited: slow down"
        );
        assert_eq!(
            LLMError::from_status(529, "overloaded".to_string(), "m").to_string(),
            "HTTP 529: overloaded"
        );
    }
}
