//! Configuration for coverage analysis

use crate::CoverageError;
use serde::{Deserialize, Serialize};

/// Minimum fame for fetch suggestions whose range ends at or before a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraThreshold {
    /// Last year of the era, inclusive
    pub until_year: i32,

    /// Minimum fame score to fetch for ranges ending in this era
    pub min_fame: u64,
}

impl EraThreshold {
    /// Create an era threshold
    pub fn new(until_year: i32, min_fame: u64) -> Self {
        Self { until_year, min_fame }
    }
}

/// Configuration for the coverage analyzer (`[coverage]` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Buckets with fewer persons are gaps
    pub min_per_bucket: usize,

    /// Buckets with fewer persons are critical gaps
    pub critical_below: usize,

    /// Buckets with fewer persons are low gaps
    pub low_below: usize,

    /// Clamp or extend the span to start at this year's century
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,

    /// Clamp or extend the span to end at this year's century
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,

    /// Era table for suggested fame thresholds, ascending by year
    pub era_thresholds: Vec<EraThreshold>,

    /// Minimum fame for ranges ending after the last era
    pub default_min_fame: u64,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            min_per_bucket: 30,
            critical_below: 10,
            low_below: 20,
            start_year: None,
            end_year: None,
            era_thresholds: vec![
                EraThreshold::new(-500, 5),
                EraThreshold::new(500, 10),
                EraThreshold::new(1500, 20),
                EraThreshold::new(1800, 40),
            ],
            default_min_fame: 60,
        }
    }
}

impl CoverageConfig {
    /// Minimum fame suggested for a range ending at `end_year`
    pub fn min_fame_for(&self, end_year: i32) -> u64 {
        self.era_thresholds
            .iter()
            .find(|era| end_year <= era.until_year)
            .map_or(self.default_min_fame, |era| era.min_fame)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CoverageError> {
        if self.min_per_bucket == 0 {
            return Err(CoverageError::Config("min_per_bucket must be greater than 0".to_string()));
        }
        if self.critical_below > self.low_below || self.low_below > self.min_per_bucket {
            return Err(CoverageError::Config(
                "thresholds must satisfy critical_below <= low_below <= min_per_bucket".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_year, self.end_year) {
            if start > end {
                return Err(CoverageError::Config(format!("start_year {} exceeds end_year {}", start, end)));
            }
        }
        if self.era_thresholds.windows(2).any(|pair| pair[0].until_year >= pair[1].until_year) {
            return Err(CoverageError::Config("era_thresholds must be ascending by until_year".to_string()));
        }
        Ok(())
    }
}
