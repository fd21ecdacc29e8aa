//! Lineage Curator
//!
//! Brings new persons and relationships into the curated dataset.
//!
//! # Overview
//!
//! The curator owns the write side of the pipeline:
//!
//! - **Identity resolution**: decide for each candidate whether it is new,
//!   an existing person seen again, or the losing side of a name collision
//! - **Merging**: fold candidates into the canonical person set (domain
//!   union, maximum fame, first writer wins for everything else)
//! - **Relation building**: add typed edges with referential and duplicate
//!   checks, and expand shared-honor groups into pairwise edges
//! - **Classification**: turn free-text occupation labels into domain tags
//!
//! # Architecture
//!
//! ```text
//! PersonRecord → IdentityResolver → Merger → Vec<Person>
//! CandidateEdge / HonorGroup → GraphBuilder → RelationGraph
//! ```
//!
//! Every stage is a pure function of the prior state and a batch. Loading
//! and persisting is the caller's job (see `lineage-store`).
//!
//! # Example Usage
//!
//! ```
//! use lineage_curator::{merge, IdentityResolver, KeywordClassifier};
//! use lineage_domain::PersonRecord;
//!
//! let candidates = vec![
//!     PersonRecord::new("X1", "Ada").with_birth_year(1815).with_domain("science").with_fame(140),
//! ];
//! let classifier = KeywordClassifier::default();
//! let outcome = merge(Vec::new(), &candidates, &IdentityResolver::new(), &classifier);
//!
//! assert_eq!(outcome.stats.added, 1);
//!
//! // Merging the same batch again changes nothing
//! let again = merge(outcome.persons, &candidates, &IdentityResolver::new(), &classifier);
//! assert_eq!(again.stats.added, 0);
//! assert_eq!(again.stats.updated_existing, 0);
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod graph;
mod identity;
mod merger;

pub use classifier::KeywordClassifier;
pub use config::CuratorConfig;
pub use error::CuratorError;
pub use graph::{EdgeStats, GraphBuilder, DEFAULT_COOCCURRENCE_NATURE};
pub use identity::{
    Contender, DecisionReason, IdentityConflict, IdentityResolver, OverrideTable, Resolution,
    ResolutionDecision, ResolverOutcome, WinnerPolicy,
};
pub use merger::{merge, MergeOutcome, MergeStats, Rejection};
