//! Trait definitions for pluggable behavior
//!
//! These traits define the seams between the curation stages and the rules
//! they depend on. Implementations live in other crates.

use std::collections::BTreeSet;

/// Maps a free-text occupation label to domain tags
///
/// Implemented by the curation layer (lineage-curator). An unknown label
/// maps to the empty set; it is never an error.
pub trait DomainClassifier {
    /// Classify one label
    fn classify(&self, label: &str) -> BTreeSet<String>;
}

impl<F> DomainClassifier for F
where
    F: Fn(&str) -> BTreeSet<String>,
{
    fn classify(&self, label: &str) -> BTreeSet<String> {
        self(label)
    }
}
