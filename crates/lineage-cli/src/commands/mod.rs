//! Command implementations.

pub mod cleanup;
pub mod config;
pub mod cooccur;
pub mod coverage;
pub mod fetch;
pub mod merge;
pub mod relate;
pub mod validate;

pub use self::cleanup::execute_cleanup;
pub use self::config::execute_config;
pub use self::cooccur::execute_cooccur;
pub use self::coverage::execute_coverage;
pub use self::fetch::execute_fetch;
pub use self::merge::execute_merge;
pub use self::relate::execute_relate;
pub use self::validate::execute_validate;

use crate::error::Result;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tracing::debug;

/// File name of the integrity report.
pub const CONSISTENCY_REPORT: &str = "consistency-report.json";

/// File name of the coverage report.
pub const COVERAGE_REPORT: &str = "coverage-report.json";

/// Read several JSON arrays and concatenate them in file order.
fn read_batch<T: DeserializeOwned>(files: &[PathBuf]) -> Result<Vec<T>> {
    let mut batch = Vec::new();
    for file in files {
        let items: Vec<T> = lineage_store::read_json(file)?;
        debug!("Read {} item(s) from {}", items.len(), file.display());
        batch.extend(items);
    }
    Ok(batch)
}
