//! Configuration for the curator

use crate::classifier::default_rules;
use crate::error::CuratorError;
use crate::graph::DEFAULT_COOCCURRENCE_NATURE;
use crate::identity::OverrideTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for the curator (`[curator]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratorConfig {
    /// Collision overrides: normalized name → identifier to keep
    ///
    /// When absent, name collisions are reported but never resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<BTreeMap<String, String>>,

    /// Override table file (`.json` or `.toml`), read by the caller
    ///
    /// Inline `overrides` entries take precedence over the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides_file: Option<PathBuf>,

    /// Nature tag used for co-occurrence edges
    #[serde(default = "default_cooccurrence_nature")]
    pub cooccurrence_nature: String,

    /// Classifier rules: domain tag → occupation keywords
    #[serde(default = "default_rules")]
    pub classifier_rules: BTreeMap<String, Vec<String>>,
}

fn default_cooccurrence_nature() -> String {
    DEFAULT_COOCCURRENCE_NATURE.to_string()
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            overrides: None,
            overrides_file: None,
            cooccurrence_nature: default_cooccurrence_nature(),
            classifier_rules: default_rules(),
        }
    }
}

impl CuratorConfig {
    /// Build the override table, if one is configured
    pub fn override_table(&self) -> Result<Option<OverrideTable>, CuratorError> {
        self.overrides
            .as_ref()
            .map(|entries| OverrideTable::from_entries(entries.clone()))
            .transpose()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cooccurrence_nature.trim().is_empty() {
            return Err("cooccurrence_nature must not be blank".to_string());
        }
        for (domain, keywords) in &self.classifier_rules {
            if domain.trim().is_empty() {
                return Err("classifier rule domains must not be blank".to_string());
            }
            if keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(format!("classifier rule '{}' has no keywords", domain));
            }
        }
        self.override_table().map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, CuratorError> {
        toml::from_str(toml_str).map_err(|e| CuratorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, CuratorError> {
        toml::to_string_pretty(self)
            .map_err(|e| CuratorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
