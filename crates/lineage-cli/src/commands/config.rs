//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{Config, LOCAL_CONFIG_FILE};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::{Path, PathBuf};

/// Execute the config command.
///
/// `located` is the file the effective configuration came from, if any;
/// `explicit` is the `--config` argument.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    located: Option<&Path>,
    explicit: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => match located {
            Some(path) => println!("{}", path.display()),
            None => println!("{}", formatter.info("No configuration file found, using built-in defaults")),
        },
        ConfigAction::Init { force } => {
            let path = explicit
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
            if path.exists() && !force {
                return Err(CliError::InvalidInput(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            Config::default().save(&path)?;
            println!("{}", formatter.success(&format!("Wrote {}", path.display())));
        }
    }
    Ok(())
}
