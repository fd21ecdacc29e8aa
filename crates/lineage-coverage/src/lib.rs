//! Lineage Coverage Analyzer
//!
//! Measures how evenly the person set covers history and points at the
//! eras that need another fetch.
//!
//! # Overview
//!
//! - **Century buckets**: every person falls into one century; the span
//!   runs from the earliest to the latest occupied century
//! - **Gap detection**: buckets under `min_per_bucket` are gaps, graded
//!   `critical`, `low` or `moderate`
//! - **Suggestions**: adjacent gaps merge into ranges, each with a
//!   [`FetchSlice`](lineage_domain::FetchSlice) whose fame threshold is
//!   lower for older eras
//! - **Breakdowns**: counts by domain, by region and by fame tier
//!
//! # Century numbering
//!
//! | Year | Century |
//! |------|---------|
//! | 1901..=2000 | 20 |
//! | 1..=100 | 1 |
//! | 0 | 0 |
//! | -100..=-1 | -1 |
//! | -200..=-101 | -2 |
//!
//! # Examples
//!
//! ```
//! use lineage_coverage::{CoverageAnalyzer, CoverageConfig};
//! use lineage_domain::Person;
//!
//! let persons = vec![
//!     Person::new("Q1", "Ada", 1815, "science", 140),
//!     Person::new("Q2", "Grace", 1906, "science", 90),
//! ];
//!
//! let report = CoverageAnalyzer::new(CoverageConfig::default()).analyze(&persons);
//! assert_eq!(report.buckets.len(), 2);
//! assert_eq!(report.gaps.len(), 1);
//! ```

#![warn(missing_docs)]

mod analyzer;
mod century;
mod config;
mod error;

pub use analyzer::{CenturyBucket, CoverageAnalyzer, CoverageLevel, CoverageReport, FameTier, GapRange};
pub use century::{bucket_range, century_index};
pub use config::{CoverageConfig, EraThreshold};
pub use error::CoverageError;
