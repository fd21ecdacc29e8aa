//! Error types for the knowledge-base adapter

use thiserror::Error;

/// Errors that can occur while fetching from the knowledge base
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The endpoint kept failing after every retry
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// The endpoint answered with something that is not a SPARQL result set
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Network communication failed
    #[error("Communication error: {0}")]
    Communication(String),

    /// The endpoint rejected the request outright
    #[error("HTTP {status}: {message}")]
    Rejected {
        /// Status code
        status: u16,
        /// Response body, possibly truncated
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
