//! Fetch command implementation.

use crate::cli::FetchArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lineage_coverage::CoverageAnalyzer;
use lineage_source::{FetchOutcome, KnowledgeBaseClient};
use lineage_store::{write_atomic, DatasetStore};
use tracing::info;

/// Execute the fetch command.
///
/// Writes the fetched records as a candidate file for a later `merge`.
pub async fn execute_fetch(args: FetchArgs, config: &Config, formatter: &Formatter) -> Result<FetchOutcome> {
    let mut slices = args.slices;

    if args.from_coverage {
        let persons = DatasetStore::new(config.paths.clone()).load_persons()?;
        let report = CoverageAnalyzer::new(config.coverage.clone()).analyze(&persons);
        info!("Coverage analysis suggested {} slice(s)", report.gaps.len());
        slices.extend(report.suggestions());
    }

    if slices.is_empty() {
        return Err(CliError::InvalidInput(
            "Nothing to fetch: pass --slice or --from-coverage".to_string(),
        ));
    }

    let client = KnowledgeBaseClient::new(config.source.clone())?;
    let outcome = client.fetch_slices(&slices).await;

    let mut bytes = serde_json::to_vec_pretty(&outcome.records)?;
    bytes.push(b'\n');
    write_atomic(&[(args.output.as_path(), bytes.as_slice())])?;

    println!("{}", formatter.fetch_outcome(&outcome, &args.output)?);
    Ok(outcome)
}
