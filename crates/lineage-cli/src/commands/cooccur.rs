//! Cooccur command implementation.

use crate::cli::CooccurArgs;
use crate::commands::read_batch;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lineage_curator::{EdgeStats, GraphBuilder};
use lineage_domain::HonorGroup;
use lineage_store::DatasetStore;
use tracing::info;

/// Execute the cooccur command.
pub fn execute_cooccur(args: CooccurArgs, config: &Config, formatter: &Formatter) -> Result<EdgeStats> {
    let nature = args
        .nature
        .unwrap_or_else(|| config.curator.cooccurrence_nature.clone());
    if nature.trim().is_empty() {
        return Err(CliError::InvalidInput("Nature must not be blank".to_string()));
    }

    let store = DatasetStore::new(config.paths.clone());
    let groups: Vec<HonorGroup> = read_batch(&args.files)?;
    let dataset = store.load_dataset()?;

    let builder = GraphBuilder::new().with_cooccurrence_nature(nature);
    let (graph, stats) = builder.add_cooccurrence(dataset.graph, &dataset.persons, &groups);

    if args.dry_run {
        info!("DRY RUN: Would add {} co-occurrence edges", stats.added);
    } else if stats.added > 0 {
        store.save_graph(&graph)?;
    }

    println!("{}", formatter.edge_stats(&stats, graph.edge_count())?);
    Ok(stats)
}
