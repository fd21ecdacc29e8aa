//! Lineage Gatekeeper
//!
//! Read-only integrity validation of the persisted dataset.
//!
//! The Gatekeeper scans the person set and the relation graph exactly as
//! they sit on disk (through the lenient record types, so that broken
//! records are reported rather than failing the load) and produces an
//! [`IntegrityReport`]:
//! - Identity checks (duplicate identifiers, shared names)
//! - Field checks (missing fields, negative fame, date plausibility)
//! - Graph checks (orphaned sources, malformed edges, target resolution)
//!
//! Each issue carries a machine-readable code, a severity, a count and a
//! bounded list of examples. A report with no critical issues is
//! well-formed.
//!
//! # Examples
//!
//! ```
//! use lineage_gatekeeper::{Gatekeeper, IntegrityConfig};
//! use lineage_domain::{PersonRecord, RawGraph};
//!
//! let gatekeeper = Gatekeeper::new(IntegrityConfig::default());
//! let records = vec![
//!     PersonRecord::new("Q1", "Ada").with_birth_year(1815).with_domain("science").with_fame(140),
//! ];
//!
//! let report = gatekeeper.validate(&records, &RawGraph::new());
//! assert!(report.is_well_formed());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::IntegrityConfig;
pub use error::GatekeeperError;
pub use validator::{Gatekeeper, IntegrityReport, Issue, IssueCode, Severity};
