//! Lineage CLI - curate a dataset of historical persons and their relations.

use clap::Parser;
use lineage_cli::cli::{ConfigAction, ConfigArgs};
use lineage_cli::commands;
use lineage_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> lineage_cli::Result<()> {
    // `config init` must work before any configuration exists
    let (config, located) = match &cli.command {
        Command::Config(ConfigArgs {
            action: ConfigAction::Init { .. },
        }) => (Config::default(), None),
        _ => Config::load(cli.config.as_deref())?,
    };

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.output.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.output.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Fetch(args) => {
            commands::execute_fetch(args, &config, &formatter).await?;
        }
        Command::Merge(args) => {
            commands::execute_merge(args, &config, &formatter)?;
        }
        Command::Relate(args) => {
            commands::execute_relate(args, &config, &formatter)?;
        }
        Command::Cooccur(args) => {
            commands::execute_cooccur(args, &config, &formatter)?;
        }
        Command::Validate(args) => {
            commands::execute_validate(args, &config, &formatter)?;
        }
        Command::Coverage(args) => {
            commands::execute_coverage(args, &config, &formatter)?;
        }
        Command::Cleanup(args) => {
            commands::execute_cleanup(args, &config, &formatter)?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, located.as_deref(), cli.config.as_deref(), &formatter)?;
        }
    }

    Ok(())
}
