//! Artifact locations

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the persisted artifacts live
///
/// Loaded from the `[paths]` section of the configuration file. Every field
/// has a default so a partial section is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Internal working copy directory
    pub working_dir: PathBuf,

    /// Published copy directory read by the presentation layer
    pub published_dir: PathBuf,

    /// Directory for consistency and coverage reports
    pub report_dir: PathBuf,

    /// File name of the person set
    pub persons_file: String,

    /// File name of the relation graph
    pub relations_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("data"),
            published_dir: PathBuf::from("public/data"),
            report_dir: PathBuf::from("reports"),
            persons_file: "persons.json".to_string(),
            relations_file: "relations.json".to_string(),
        }
    }
}

impl StoreConfig {
    /// Configuration rooted at a single base directory
    ///
    /// Useful for tests and for operators keeping everything in one place.
    pub fn rooted_at(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            working_dir: base.join("data"),
            published_dir: base.join("public").join("data"),
            report_dir: base.join("reports"),
            ..Self::default()
        }
    }

    /// Working and published locations of the person set
    pub fn persons_paths(&self) -> [PathBuf; 2] {
        [
            self.working_dir.join(&self.persons_file),
            self.published_dir.join(&self.persons_file),
        ]
    }

    /// Working and published locations of the relation graph
    pub fn relations_paths(&self) -> [PathBuf; 2] {
        [
            self.working_dir.join(&self.relations_file),
            self.published_dir.join(&self.relations_file),
        ]
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.persons_file.trim().is_empty() {
            return Err("persons_file must not be empty".to_string());
        }
        if self.relations_file.trim().is_empty() {
            return Err("relations_file must not be empty".to_string());
        }
        if self.persons_file == self.relations_file {
            return Err("persons_file and relations_file must differ".to_string());
        }
        if self.working_dir == self.published_dir {
            return Err("working_dir and published_dir must differ".to_string());
        }
        Ok(())
    }
}
