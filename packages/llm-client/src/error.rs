//! Error types for the LLM client.

use thiserror::Error;

/// Result type for LLM client operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration error (missing API key, unknown provider)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, invalid request)
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}
