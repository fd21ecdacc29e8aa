//! Lineage Storage Layer
//!
//! The only place in the workspace that touches the filesystem. Every
//! curation stage is a pure function over in-memory state; commands load
//! state through this crate, run a stage, and hand the result back here.
//!
//! # Artifacts
//!
//! - Person set: JSON array sorted by descending fame score
//! - Relation graph: JSON object keyed by source identifier
//! - Reports: one JSON document per run, overwritten
//!
//! The person set and relation graph are each written to two locations
//! (a working copy and a published copy) that are byte-identical after
//! every successful write.
//!
//! # Examples
//!
//! ```no_run
//! use lineage_store::{DatasetStore, StoreConfig};
//!
//! let store = DatasetStore::new(StoreConfig::default());
//! let persons = store.load_persons().unwrap();
//! store.save_persons(&persons).unwrap();
//! ```

#![warn(missing_docs)]

mod atomic;
mod config;
mod dataset;

pub use atomic::write_atomic;
pub use config::StoreConfig;
pub use dataset::{read_json, sort_for_publication, Dataset, DatasetStore};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
///
/// Any of these is fatal to a pipeline run. Writes are staged so that a
/// failure leaves previously persisted artifacts untouched.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Artifact is not valid JSON for the expected shape
    #[error("Invalid data in {path}: {source}")]
    InvalidData {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Serialization failed before anything was written
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A staged file could not be moved into place
    ///
    /// A non-empty `committed` list means the copies now disagree: those
    /// files already hold the new contents while `path` and any later
    /// targets still hold the old ones.
    #[error("Failed to commit {path} ({} file(s) already replaced): {source}", committed.len())]
    Commit {
        /// Destination path
        path: PathBuf,
        /// Targets replaced before the failure
        committed: Vec<PathBuf>,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
