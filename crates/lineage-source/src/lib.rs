//! Lineage Knowledge-Base Source
//!
//! Fetches candidate person records from a public SPARQL endpoint, one
//! [`FetchSlice`](lineage_domain::FetchSlice) at a time.
//!
//! # Features
//!
//! - Async HTTP via `reqwest` with a per-request timeout
//! - Fixed pause between slice requests
//! - Exponential backoff for HTTP 429, 5xx, timeouts and connection errors
//! - Slices that keep failing are skipped and reported; the batch goes on
//!
//! # Examples
//!
//! ```no_run
//! use lineage_domain::FetchSlice;
//! use lineage_source::{KnowledgeBaseClient, SourceConfig};
//!
//! # async fn run() -> Result<(), lineage_source::SourceError> {
//! let client = KnowledgeBaseClient::new(SourceConfig::default())?;
//! let outcome = client
//!     .fetch_slices(&[FetchSlice::new(-500, -401, 5), FetchSlice::new(1801, 1900, 40)])
//!     .await;
//! println!("{}", outcome.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod error;
pub mod sparql;

pub use client::{FetchOutcome, KnowledgeBaseClient, SkippedSlice};
pub use config::{SourceConfig, DEFAULT_ENDPOINT};
pub use error::SourceError;
