use thiserror::Error;

/// Errors raised by the blockchain service client
#[derive(Debug, Error)]
pub enum ChainError {
    /// Transport failure, including timeouts
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Blockchain service error {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Invalid response from blockchain service: {0}")]
    InvalidResponse(String),
}

impl ChainError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

/// Result type for blockchain service operations
pub type ChainResult<T> = Result<T, ChainError>;
