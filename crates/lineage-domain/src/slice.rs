//! Fetch slices: the unit of work for knowledge-base queries

use serde::{Deserialize, Serialize};
use std::fmt;

/// A birth-year window plus a minimum fame threshold
///
/// Coverage analysis suggests slices for under-represented eras; the source
/// adapter turns each slice into one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchSlice {
    /// First birth year, inclusive
    pub start_year: i32,

    /// Last birth year, inclusive
    pub end_year: i32,

    /// Minimum fame score for a person to be fetched
    pub min_fame: u64,
}

impl FetchSlice {
    /// Create a slice
    pub fn new(start_year: i32, end_year: i32, min_fame: u64) -> Self {
        Self {
            start_year,
            end_year,
            min_fame,
        }
    }

    /// Whether the window is non-empty
    pub fn is_valid(&self) -> bool {
        self.start_year <= self.end_year
    }

    /// Whether a birth year falls inside the window
    pub fn contains(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }
}

impl fmt::Display for FetchSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={} (fame ≥ {})", self.start_year, self.end_year, self.min_fame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let slice = FetchSlice::new(-200, -101, 5);
        assert!(slice.contains(-200));
        assert!(slice.contains(-101));
        assert!(!slice.contains(-100));
        assert!(slice.is_valid());
        assert!(!FetchSlice::new(10, 9, 0).is_valid());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(FetchSlice::new(1501, 1600, 20)).unwrap();
        assert_eq!(json["startYear"], 1501);
        assert_eq!(json["minFame"], 20);
    }
}
