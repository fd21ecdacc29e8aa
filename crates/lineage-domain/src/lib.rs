//! Lineage Domain Layer
//!
//! This crate contains the domain model shared by every curation stage.
//! It defines the value types that are persisted, the lenient record types
//! that arrive from sources, and the trait seams the pipeline plugs into.
//!
//! ## Key Concepts
//!
//! - **Person**: A curated historical person keyed by a stable external identifier
//! - **PersonRecord**: A lenient, all-optional record as delivered by a source
//! - **RelationEdge**: A typed, directed, weighted edge between two persons
//! - **RelationGraph**: Outgoing edges per source identifier, in curation order
//! - **PersonIndex**: Lookup by identifier and by display name
//! - **FetchSlice**: A birth-year window with a fame threshold, the unit of fetching
//!
//! ## Architecture
//!
//! - Pure data and lookups only, no I/O
//! - Stages (merge, relate, validate, analyze) live in other crates and take
//!   these types by reference, returning new values plus statistics

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;
pub mod name;
pub mod person;
pub mod record;
pub mod relation;
pub mod slice;
pub mod traits;

// Re-exports for convenience
pub use error::ValidationError;
pub use index::{PersonIndex, TargetResolution};
pub use name::normalize_name;
pub use person::{Person, PersonId, MAX_LIFESPAN_YEARS};
pub use record::{CandidateEdge, EdgeRecord, HonorGroup, PersonRecord, RawGraph};
pub use relation::{RelationEdge, RelationGraph};
pub use slice::FetchSlice;
pub use traits::DomainClassifier;
