use thiserror::Error;

/// Errors raised while talking to the language model
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport failure, including timeouts
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("LLM API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Provider answered but without any content
    #[error("LLM returned empty response")]
    EmptyResponse,

    /// Response body did not have the expected shape
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Model output could not be decoded into the requested type
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;
