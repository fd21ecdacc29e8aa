//! Configuration for Janitor operations

use crate::JanitorError;
use serde::{Deserialize, Serialize};

/// Configuration for the Janitor (`[janitor]` section)
///
/// Controls which cleanup passes run and whether changes are applied.
///
/// # Examples
///
/// ```
/// use lineage_janitor::JanitorConfig;
///
/// // Default: orphan removal and name-target migration, no dedup
/// let config = JanitorConfig::default();
/// assert!(!config.resolve_duplicates);
///
/// // Aggressive: every pass, including dedup resolution
/// let config = JanitorConfig::aggressive();
/// assert!(config.resolve_duplicates);
///
/// // Lenient: only report what would change
/// let config = JanitorConfig::lenient();
/// assert!(config.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Dry-run mode: count and log what would change without changing it
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Remove persons that lose a normalized-name collision
    /// Default: false (destructive; must be asked for)
    #[serde(default)]
    pub resolve_duplicates: bool,

    /// Remove edge lists without a source and edges without a target
    /// Default: true
    #[serde(default = "default_true")]
    pub remove_orphans: bool,

    /// Rewrite uniquely resolvable name targets to identifiers
    /// Default: true
    #[serde(default = "default_true")]
    pub migrate_name_targets: bool,
}

fn default_true() -> bool {
    true
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            resolve_duplicates: false,
            remove_orphans: true,
            migrate_name_targets: true,
        }
    }
}

impl JanitorConfig {
    /// Aggressive cleanup: every pass, applied
    pub fn aggressive() -> Self {
        Self {
            dry_run: false,
            resolve_duplicates: true,
            remove_orphans: true,
            migrate_name_targets: true,
        }
    }

    /// Lenient cleanup: every pass, reported only
    pub fn lenient() -> Self {
        Self {
            dry_run: true,
            resolve_duplicates: true,
            remove_orphans: true,
            migrate_name_targets: true,
        }
    }

    /// Whether any pass is enabled
    pub fn any_pass_enabled(&self) -> bool {
        self.resolve_duplicates || self.remove_orphans || self.migrate_name_targets
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), JanitorError> {
        if !self.any_pass_enabled() {
            return Err(JanitorError::Config("no cleanup pass is enabled".to_string()));
        }
        Ok(())
    }
}
