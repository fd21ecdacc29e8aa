//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persistence error
    #[error(transparent)]
    Store(#[from] lineage_store::StoreError),

    /// Curator error
    #[error(transparent)]
    Curator(#[from] lineage_curator::CuratorError),

    /// Validator error
    #[error(transparent)]
    Gatekeeper(#[from] lineage_gatekeeper::GatekeeperError),

    /// Cleanup error
    #[error(transparent)]
    Janitor(#[from] lineage_janitor::JanitorError),

    /// Coverage error
    #[error(transparent)]
    Coverage(#[from] lineage_coverage::CoverageError),

    /// Knowledge-base error
    #[error(transparent)]
    Source(#[from] lineage_source::SourceError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The dataset failed validation
    #[error("{0} critical integrity issue(s) found")]
    CriticalIssues(usize),
}
