//! Gatekeeper configuration

use crate::GatekeeperError;
use lineage_domain::MAX_LIFESPAN_YEARS;
use serde::{Deserialize, Serialize};

/// Configuration for integrity checks (`[integrity]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityConfig {
    /// Flag identifiers that occur more than once
    pub check_duplicate_ids: bool,

    /// Flag normalized names shared by distinct identifiers
    pub check_duplicate_names: bool,

    /// Flag missing or blank required fields
    pub check_required_fields: bool,

    /// Flag negative fame scores
    pub check_negative_fame: bool,

    /// Flag birth years out of range and implausible lifespans
    pub check_dates: bool,

    /// Flag fame scores below `min_fame_score`
    pub check_low_fame: bool,

    /// Flag graph keys that are not in the person set
    pub check_orphaned_edges: bool,

    /// Flag edges with missing fields or out-of-range confidence
    pub check_malformed_edges: bool,

    /// Flag edge targets that resolve to nobody or to several persons
    pub check_edge_targets: bool,

    /// Flag edge targets stored by name that resolve uniquely
    pub check_name_keyed_targets: bool,

    /// Flag repeated (target, nature) pairs under one source
    pub check_duplicate_edges: bool,

    /// Earliest accepted birth year
    pub min_birth_year: i64,

    /// Latest accepted birth year
    pub max_birth_year: i64,

    /// Maximum years between birth and death
    pub max_lifespan: i64,

    /// Fame scores below this are flagged as low
    pub min_fame_score: i64,

    /// Examples kept per issue code
    pub max_examples: usize,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            check_duplicate_ids: true,
            check_duplicate_names: true,
            check_required_fields: true,
            check_negative_fame: true,
            check_dates: true,
            check_low_fame: true,
            check_orphaned_edges: true,
            check_malformed_edges: true,
            check_edge_targets: true,
            check_name_keyed_targets: true,
            check_duplicate_edges: true,
            min_birth_year: -3500,
            max_birth_year: 2025,
            max_lifespan: i64::from(MAX_LIFESPAN_YEARS),
            min_fame_score: 0,
            max_examples: 10,
        }
    }
}

impl IntegrityConfig {
    /// Create a permissive configuration (structural checks only)
    pub fn permissive() -> Self {
        Self {
            check_duplicate_names: false,
            check_low_fame: false,
            check_name_keyed_targets: false,
            ..Self::default()
        }
    }

    /// Create a strict configuration (all checks, tighter thresholds)
    pub fn strict() -> Self {
        Self {
            min_fame_score: 10,
            max_examples: 50,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.min_birth_year > self.max_birth_year {
            return Err(GatekeeperError::Config(format!(
                "min_birth_year {} exceeds max_birth_year {}",
                self.min_birth_year, self.max_birth_year
            )));
        }
        if self.max_lifespan <= 0 {
            return Err(GatekeeperError::Config("max_lifespan must be greater than 0".to_string()));
        }
        if self.min_fame_score < 0 {
            return Err(GatekeeperError::Config("min_fame_score cannot be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IntegrityConfig::default();
        assert!(config.check_duplicate_ids);
        assert!(config.check_dates);
        assert_eq!(config.max_lifespan, 120);
        assert_eq!(config.max_examples, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_permissive_config() {
        let config = IntegrityConfig::permissive();
        assert!(!config.check_duplicate_names);
        assert!(!config.check_low_fame);
        assert!(config.check_orphaned_edges);
    }

    #[test]
    fn test_strict_config() {
        let config = IntegrityConfig::strict();
        assert_eq!(config.min_fame_score, 10);
        assert!(config.check_name_keyed_targets);
    }

    #[test]
    fn test_invalid_ranges() {
        let config = IntegrityConfig {
            min_birth_year: 2000,
            max_birth_year: 1000,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = IntegrityConfig {
            max_lifespan: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_section() {
        let config: IntegrityConfig = toml::from_str("max_examples = 3\ncheck_low_fame = false").unwrap();
        assert_eq!(config.max_examples, 3);
        assert!(!config.check_low_fame);
        assert!(config.check_duplicate_ids);
    }
}
