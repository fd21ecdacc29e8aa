//! Cleanup command implementation.

use crate::cli::CleanupArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use lineage_janitor::{Janitor, JanitorMetrics};
use lineage_store::DatasetStore;
use tracing::info;

/// Execute the cleanup command.
pub fn execute_cleanup(args: CleanupArgs, config: &Config, formatter: &Formatter) -> Result<JanitorMetrics> {
    let mut janitor_config = config.janitor.clone();
    janitor_config.dry_run |= args.dry_run;
    janitor_config.resolve_duplicates |= args.resolve_duplicates;

    let mut janitor = Janitor::new(janitor_config);
    if let Some(table) = config.override_table()? {
        janitor = janitor.with_policy(table);
    }

    let store = DatasetStore::new(config.paths.clone());
    let mut dataset = store.load_dataset()?;
    let metrics = janitor.sweep(&mut dataset)?;

    if metrics.dry_run {
        info!("DRY RUN: Would apply {} change(s)", metrics.total_changes());
    } else if metrics.total_changes() > 0 {
        store.save_dataset(&dataset)?;
    }

    println!("{}", formatter.janitor_metrics(&metrics)?);
    Ok(metrics)
}
