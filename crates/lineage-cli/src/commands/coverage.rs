//! Coverage command implementation.

use crate::cli::CoverageArgs;
use crate::commands::COVERAGE_REPORT;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use lineage_coverage::{CoverageAnalyzer, CoverageReport};
use lineage_store::DatasetStore;
use tracing::info;

/// Execute the coverage command.
pub fn execute_coverage(args: CoverageArgs, config: &Config, formatter: &Formatter) -> Result<CoverageReport> {
    let mut coverage = config.coverage.clone();
    if let Some(min) = args.min_per_bucket {
        // Lower the grading thresholds with the gap threshold so they stay ordered
        coverage.min_per_bucket = min;
        coverage.low_below = coverage.low_below.min(min);
        coverage.critical_below = coverage.critical_below.min(min);
    }
    coverage.validate()?;

    let store = DatasetStore::new(config.paths.clone());
    let persons = store.load_persons()?;
    let report = CoverageAnalyzer::new(coverage).analyze(&persons);

    if !args.no_report {
        let path = store.write_report(COVERAGE_REPORT, &report)?;
        info!("Coverage report written to {}", path.display());
    }

    println!("{}", formatter.coverage_report(&report)?);
    Ok(report)
}
