//! Configuration management for the CLI.
//!
//! One TOML file carries a section per stage. Every section is optional.

use crate::error::{CliError, Result};
use lineage_coverage::CoverageConfig;
use lineage_curator::{CuratorConfig, OverrideTable};
use lineage_gatekeeper::IntegrityConfig;
use lineage_janitor::JanitorConfig;
use lineage_source::SourceConfig;
use lineage_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "lineage.toml";

/// Whole-pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Artifact locations
    pub paths: StoreConfig,

    /// Merge and relation settings
    pub curator: CuratorConfig,

    /// Integrity checks
    pub integrity: IntegrityConfig,

    /// Coverage thresholds
    pub coverage: CoverageConfig,

    /// Cleanup passes
    pub janitor: JanitorConfig,

    /// Knowledge-base endpoint
    pub source: SourceConfig,

    /// Output settings
    pub output: Settings,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Per-user configuration file path.
    pub fn user_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".lineage").join("config.toml"))
    }

    /// Locate the configuration file.
    ///
    /// An explicit path wins, then `lineage.toml` in the current directory,
    /// then `~/.lineage/config.toml`. `None` means built-in defaults.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        Self::user_path().filter(|path| path.is_file())
    }

    /// Load and validate the configuration.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let located = Self::locate(explicit);
        let config = match &located {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok((config, located))
    }

    /// Read a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parse a configuration document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize the configuration.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Write the configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Build the collision override table.
    ///
    /// Entries from `[curator].overrides_file` are read first (JSON when the
    /// extension is `.json`, TOML otherwise), then inline entries replace
    /// them. `None` means report-only collision handling.
    pub fn override_table(&self) -> Result<Option<OverrideTable>> {
        let mut entries: Option<BTreeMap<String, String>> = None;

        if let Some(path) = &self.curator.overrides_file {
            let contents = fs::read_to_string(path).map_err(|e| {
                CliError::Config(format!("Failed to read override table {}: {}", path.display(), e))
            })?;
            let from_file: BTreeMap<String, String> =
                if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
                    serde_json::from_str(&contents)?
                } else {
                    toml::from_str(&contents)?
                };
            entries = Some(from_file);
        }

        if let Some(inline) = &self.curator.overrides {
            entries.get_or_insert_with(BTreeMap::new).extend(inline.clone());
        }

        Ok(entries.map(OverrideTable::from_entries).transpose()?)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.paths.validate().map_err(|e| CliError::Config(format!("[paths] {}", e)))?;
        self.curator.validate().map_err(|e| CliError::Config(format!("[curator] {}", e)))?;
        self.override_table()?;
        self.integrity.validate()?;
        self.coverage.validate()?;
        self.janitor.validate()?;
        self.source.validate()?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
