//! Person module - the curated unit of the dataset

use crate::name::normalize_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Longest plausible lifespan in years
pub const MAX_LIFESPAN_YEARS: i32 = 120;

/// Stable external identifier of a person
///
/// Identifiers come from the source that first produced the person (for
/// example a knowledge-base item key such as `Q7259`). They are opaque
/// strings and compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Create an identifier from any string-like value
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage_domain::PersonId;
    ///
    /// let id = PersonId::new("Q7259");
    /// assert_eq!(id.as_str(), "Q7259");
    /// ```
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PersonId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A curated historical person
///
/// Structural invariants (non-empty name, non-empty domains, present birth
/// year, non-negative fame) are guaranteed by construction through
/// [`PersonRecord::into_person`](crate::PersonRecord::into_person).
/// Date plausibility is deliberately not part of the type: implausible
/// records stay loadable so the integrity scan can report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Stable external identifier (primary key)
    pub id: PersonId,

    /// Display name, not unique across persons
    pub name: String,

    /// Birth year on the astronomical axis (negative = BCE)
    pub birth_year: i32,

    /// Death year; `None` means living or unknown
    #[serde(default)]
    pub death_year: Option<i32>,

    /// Category tags
    pub domains: BTreeSet<String>,

    /// Short geographic code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Popularity proxy
    pub fame_score: u64,
}

impl Person {
    /// Create a person with a single domain tag and no death year
    pub fn new(
        id: impl Into<PersonId>,
        name: impl Into<String>,
        birth_year: i32,
        domain: impl Into<String>,
        fame_score: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            birth_year,
            death_year: None,
            domains: BTreeSet::from([domain.into()]),
            region: None,
            fame_score,
        }
    }

    /// Normalized name used for collision detection
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Lifespan in years when the death year is known
    ///
    /// Widened to `i64` so extreme year pairs cannot overflow.
    pub fn lifespan(&self) -> Option<i64> {
        self.death_year
            .map(|death| i64::from(death) - i64::from(self.birth_year))
    }

    /// Whether the dates satisfy `birth <= death <= birth + 120`
    ///
    /// Persons without a real death year are always plausible here.
    pub fn has_plausible_lifespan(&self) -> bool {
        match self.lifespan() {
            Some(span) => (0..=i64::from(MAX_LIFESPAN_YEARS)).contains(&span),
            None => true,
        }
    }
}
