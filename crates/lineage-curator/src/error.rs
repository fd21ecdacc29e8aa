//! Error types for the curator

use thiserror::Error;

/// Errors that can occur while setting up curation
///
/// Per-record problems are never errors here: they are recorded in the
/// stage statistics and the batch continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CuratorError {
    /// Override table entry with a blank name or identifier
    #[error("Invalid override entry: {0}")]
    InvalidOverride(String),

    /// Classifier rule without keywords or with a blank domain
    #[error("Invalid classifier rule: {0}")]
    InvalidRule(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
