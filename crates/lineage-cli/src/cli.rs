//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use lineage_domain::FetchSlice;
use std::path::PathBuf;

/// Lineage - curate a dataset of historical persons and their relations.
#[derive(Debug, Parser)]
#[command(name = "lineage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LINEAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Log filter implied by `-v`/`-q`, used when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (counts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch candidate persons from the knowledge base
    Fetch(FetchArgs),

    /// Merge candidate person files into the person set
    Merge(MergeArgs),

    /// Add candidate relation edges to the graph
    Relate(RelateArgs),

    /// Expand honor groups into co-occurrence edges
    Cooccur(CooccurArgs),

    /// Check the persisted dataset for integrity issues
    Validate(ValidateArgs),

    /// Analyze historical coverage and suggest fetches
    Coverage(CoverageArgs),

    /// Run the explicit cleanup passes
    Cleanup(CleanupArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the fetch command.
#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// Slice to fetch as START:END:MIN_FAME (repeatable)
    #[arg(short, long = "slice", value_parser = parse_slice, allow_hyphen_values = true)]
    pub slices: Vec<FetchSlice>,

    /// Fetch the slices suggested by a coverage analysis of the current set
    #[arg(long)]
    pub from_coverage: bool,

    /// Candidate file to write
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the merge command.
#[derive(Debug, Parser)]
pub struct MergeArgs {
    /// Candidate person files (JSON arrays)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the relate command.
#[derive(Debug, Parser)]
pub struct RelateArgs {
    /// Candidate edge files (JSON arrays)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the cooccur command.
#[derive(Debug, Parser)]
pub struct CooccurArgs {
    /// Honor group files (JSON arrays)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Nature tag for the generated edges
    #[arg(short, long)]
    pub nature: Option<String>,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the validate command.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Use the strict preset instead of the configured checks
    #[arg(long, conflicts_with = "permissive")]
    pub strict: bool,

    /// Use the permissive preset instead of the configured checks
    #[arg(long)]
    pub permissive: bool,

    /// Exit successfully even when critical issues are found
    #[arg(long)]
    pub allow_critical: bool,

    /// Do not write consistency-report.json
    #[arg(long)]
    pub no_report: bool,
}

/// Arguments for the coverage command.
#[derive(Debug, Parser)]
pub struct CoverageArgs {
    /// Override the per-century gap threshold
    #[arg(long)]
    pub min_per_bucket: Option<usize>,

    /// Do not write coverage-report.json
    #[arg(long)]
    pub no_report: bool,
}

/// Arguments for the cleanup command.
#[derive(Debug, Parser)]
pub struct CleanupArgs {
    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Also resolve duplicate names, removing the losers
    #[arg(long)]
    pub resolve_duplicates: bool,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file in use
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

/// Parse `START:END:MIN_FAME` into a slice.
fn parse_slice(value: &str) -> Result<FetchSlice, String> {
    let parts: Vec<&str> = value.split(':').collect();
    let [start, end, min_fame] = parts.as_slice() else {
        return Err(format!("expected START:END:MIN_FAME, got '{}'", value));
    };

    let start: i32 = start.trim().parse().map_err(|e| format!("invalid start year '{}': {}", start, e))?;
    let end: i32 = end.trim().parse().map_err(|e| format!("invalid end year '{}': {}", end, e))?;
    let min_fame: u64 = min_fame
        .trim()
        .parse()
        .map_err(|e| format!("invalid minimum fame '{}': {}", min_fame, e))?;

    let slice = FetchSlice::new(start, end, min_fame);
    if !slice.is_valid() {
        return Err(format!("start year {} is after end year {}", start, end));
    }
    Ok(slice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_command() {
        let cli = Cli::parse_from(["lineage", "merge", "a.json", "b.json", "--dry-run"]);
        match cli.command {
            Command::Merge(args) => {
                assert_eq!(args.files.len(), 2);
                assert!(args.dry_run);
            }
            _ => panic!("Expected Merge command"),
        }
    }

    #[test]
    fn test_merge_requires_files() {
        assert!(Cli::try_parse_from(["lineage", "merge"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["lineage", "validate", "--allow-critical", "-f", "json", "-vv"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.log_level(), "trace");
        match cli.command {
            Command::Validate(args) => assert!(args.allow_critical),
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["lineage", "-q", "-v", "coverage"]).is_err());
        let cli = Cli::parse_from(["lineage", "-q", "coverage"]);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_slice_parsing() {
        let cli = Cli::parse_from([
            "lineage",
            "fetch",
            "--slice",
            "-700:-601:5",
            "-s",
            "1801:1900:40",
            "-o",
            "out.json",
        ]);
        match cli.command {
            Command::Fetch(args) => {
                assert_eq!(args.slices, vec![FetchSlice::new(-700, -601, 5), FetchSlice::new(1801, 1900, 40)]);
            }
            _ => panic!("Expected Fetch command"),
        }
    }

    #[test]
    fn test_bad_slices() {
        assert!(parse_slice("1800:1900").is_err());
        assert!(parse_slice("1900:1800:10").is_err());
        assert!(parse_slice("a:b:c").is_err());
        assert!(parse_slice("1800:1900:-1").is_err());
    }

    #[test]
    fn test_strict_conflicts_with_permissive() {
        assert!(Cli::try_parse_from(["lineage", "validate", "--strict", "--permissive"]).is_err());
    }
}
