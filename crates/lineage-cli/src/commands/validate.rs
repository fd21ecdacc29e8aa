//! Validate command implementation.

use crate::cli::ValidateArgs;
use crate::commands::CONSISTENCY_REPORT;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lineage_gatekeeper::{Gatekeeper, IntegrityConfig, IntegrityReport};
use lineage_store::DatasetStore;
use tracing::{info, warn};

/// Execute the validate command.
///
/// Reads the persisted artifacts leniently so that malformed records are
/// reported instead of aborting the load.
///
/// # Errors
///
/// Returns [`CliError::CriticalIssues`] when critical issues were found and
/// `--allow-critical` was not given. The report is written first.
pub fn execute_validate(args: ValidateArgs, config: &Config, formatter: &Formatter) -> Result<IntegrityReport> {
    let integrity = if args.strict {
        IntegrityConfig::strict()
    } else if args.permissive {
        IntegrityConfig::permissive()
    } else {
        config.integrity.clone()
    };

    let store = DatasetStore::new(config.paths.clone());
    let records = store.load_person_records()?;
    let graph = store.load_raw_graph()?;

    let report = Gatekeeper::new(integrity).validate(&records, &graph);

    if !args.no_report {
        let path = store.write_report(CONSISTENCY_REPORT, &report)?;
        info!("Integrity report written to {}", path.display());
    }

    println!("{}", formatter.integrity_report(&report)?);

    if !report.is_well_formed() {
        if args.allow_critical {
            warn!("{} critical issue(s) allowed by --allow-critical", report.critical_count());
        } else {
            return Err(CliError::CriticalIssues(report.critical_count()));
        }
    }
    Ok(report)
}
