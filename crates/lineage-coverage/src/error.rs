//! Error types for coverage analysis

use thiserror::Error;

/// Errors that can occur during coverage analysis
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoverageError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
