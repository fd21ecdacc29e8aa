//! Relate command implementation.

use crate::cli::RelateArgs;
use crate::commands::read_batch;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use lineage_curator::{EdgeStats, GraphBuilder};
use lineage_domain::CandidateEdge;
use lineage_store::DatasetStore;
use tracing::info;

/// Execute the relate command.
pub fn execute_relate(args: RelateArgs, config: &Config, formatter: &Formatter) -> Result<EdgeStats> {
    let store = DatasetStore::new(config.paths.clone());
    let candidates: Vec<CandidateEdge> = read_batch(&args.files)?;
    let dataset = store.load_dataset()?;

    let builder = GraphBuilder::new().with_cooccurrence_nature(config.curator.cooccurrence_nature.clone());
    let (graph, stats) = builder.add_edges(dataset.graph, &dataset.persons, &candidates);

    if args.dry_run {
        info!("DRY RUN: Would add {} edges", stats.added);
    } else if stats.added > 0 {
        store.save_graph(&graph)?;
    }

    println!("{}", formatter.edge_stats(&stats, graph.edge_count())?);
    Ok(stats)
}
