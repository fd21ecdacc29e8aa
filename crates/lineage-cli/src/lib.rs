//! Lineage CLI library.
//!
//! Each subcommand is a thin read-modify-write shell around one pipeline
//! stage: load through [`lineage_store::DatasetStore`], run the stage, save,
//! print the stage's stats.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
