//! Merge command implementation.

use crate::cli::MergeArgs;
use crate::commands::read_batch;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use lineage_curator::{merge, IdentityResolver, KeywordClassifier, MergeStats};
use lineage_domain::PersonRecord;
use lineage_store::DatasetStore;
use tracing::info;

/// Execute the merge command.
pub fn execute_merge(args: MergeArgs, config: &Config, formatter: &Formatter) -> Result<MergeStats> {
    let store = DatasetStore::new(config.paths.clone());
    let candidates: Vec<PersonRecord> = read_batch(&args.files)?;
    let existing = store.load_persons()?;

    let classifier = KeywordClassifier::new(&config.curator.classifier_rules)?;
    let resolver = match config.override_table()? {
        Some(table) => IdentityResolver::new().with_overrides(table),
        None => IdentityResolver::new(),
    };

    let outcome = merge(existing, &candidates, &resolver, &classifier);

    if args.dry_run {
        info!("DRY RUN: Would write {} persons", outcome.persons.len());
    } else if outcome.stats.changed() {
        store.save_persons(&outcome.persons)?;
    } else {
        info!("Person set unchanged, nothing written");
    }

    println!("{}", formatter.merge_outcome(&outcome)?);
    Ok(outcome.stats)
}
