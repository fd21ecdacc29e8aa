//! Validation errors for individual records

use thiserror::Error;

/// A single record is structurally invalid.
///
/// Validation errors reject only the offending record; the surrounding
/// batch always continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is absent
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A required string field is present but blank
    #[error("blank required field: {0}")]
    BlankField(&'static str),

    /// The record carries no domain tag, neither explicit nor classified
    #[error("record has no domain tags")]
    EmptyDomains,

    /// Fame score below zero
    #[error("fame score must be non-negative, got {0}")]
    NegativeFame(i64),

    /// A year does not fit the supported year axis
    #[error("{field} out of range: {value}")]
    YearOutOfRange {
        /// Field name
        field: &'static str,
        /// Offending value
        value: i64,
    },

    /// Edge confidence outside (0, 1]
    #[error("confidence must be in (0, 1], got {0}")]
    InvalidConfidence(f64),

    /// An edge pointing at its own source
    #[error("self-referencing edge on {0}")]
    SelfEdge(String),
}
