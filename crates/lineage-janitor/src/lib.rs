//! Lineage Janitor
//!
//! Explicit, operator-invoked cleanup of the curated dataset.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Dedup resolution**: Keeping one person per normalized name, chosen by
//!   the override table with fame fallback
//! - **Name-target migration**: Rewriting legacy edges that point at a
//!   display name so they point at the identifier instead
//! - **Orphan-edge removal**: Dropping edge lists whose source is gone and
//!   edges whose target resolves to nobody
//! - **Metrics collection**: Counting every change for the run summary
//!
//! # Passes
//!
//! | Pass | Config flag | Default | Destructive |
//! |------|-------------|---------|-------------|
//! | Dedup resolution | `resolve_duplicates` | off | removes persons |
//! | Name-target migration | `migrate_name_targets` | on | rewrites edges |
//! | Orphan-edge removal | `remove_orphans` | on | removes edges |
//!
//! Every pass honors `dry_run`.
//!
//! # Usage
//!
//! ```no_run
//! use lineage_janitor::{Janitor, JanitorConfig};
//! use lineage_store::{DatasetStore, StoreConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DatasetStore::new(StoreConfig::default());
//! let mut dataset = store.load_dataset()?;
//!
//! let mut janitor = Janitor::new(JanitorConfig::default());
//! let metrics = janitor.sweep(&mut dataset)?;
//! println!("{}", metrics.summary());
//!
//! if !metrics.dry_run {
//!     store.save_dataset(&dataset)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [janitor]
//! dry_run = false
//! resolve_duplicates = false
//! remove_orphans = true
//! migrate_name_targets = true
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;

pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::Janitor;
pub use metrics::JanitorMetrics;
