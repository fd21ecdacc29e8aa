//! Coverage analysis over the person set

use crate::century::{bucket_range, century_index};
use crate::CoverageConfig;
use lineage_domain::{FetchSlice, Person};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// How well a century is covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageLevel {
    /// Far below the target
    Critical,
    /// Well below the target
    Low,
    /// Close to the target
    Moderate,
    /// At or above the target
    Good,
}

impl CoverageLevel {
    /// Whether this level counts as a gap
    pub fn is_gap(self) -> bool {
        self != CoverageLevel::Good
    }
}

impl fmt::Display for CoverageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CoverageLevel::Critical => "critical",
            CoverageLevel::Low => "low",
            CoverageLevel::Moderate => "moderate",
            CoverageLevel::Good => "good",
        };
        f.write_str(label)
    }
}

/// Fame tiers with fixed breakpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FameTier {
    /// 200 and above
    Legendary,
    /// 100 to 199
    Major,
    /// 50 to 99
    Notable,
    /// 20 to 49
    Minor,
    /// Below 20
    Obscure,
}

impl FameTier {
    /// Tier for a fame score
    pub fn of(fame_score: u64) -> Self {
        match fame_score {
            200.. => FameTier::Legendary,
            100..=199 => FameTier::Major,
            50..=99 => FameTier::Notable,
            20..=49 => FameTier::Minor,
            _ => FameTier::Obscure,
        }
    }
}

/// Person count for one century
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CenturyBucket {
    /// Century index
    pub century: i32,
    /// First year, inclusive
    pub start_year: i32,
    /// Last year, inclusive
    pub end_year: i32,
    /// Persons born in the century
    pub count: usize,
    /// Coverage level
    pub level: CoverageLevel,
}

/// Contiguous run of under-covered centuries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapRange {
    /// First year, inclusive
    pub start_year: i32,
    /// Last year, inclusive
    pub end_year: i32,
    /// Centuries in the range
    pub centuries: Vec<i32>,
    /// Persons in the range
    pub total: usize,
    /// Worst level among the centuries
    pub worst: CoverageLevel,
    /// Suggested follow-up fetch
    pub suggestion: FetchSlice,
}

/// Result of a coverage analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    /// Persons analyzed
    pub total_persons: usize,
    /// Gap threshold used
    pub min_per_bucket: usize,
    /// Persons born outside the configured span
    pub outside_span: usize,
    /// Century buckets in ascending order
    pub buckets: Vec<CenturyBucket>,
    /// Merged gap ranges in ascending order
    pub gaps: Vec<GapRange>,
    /// Persons per domain tag
    pub by_domain: BTreeMap<String, usize>,
    /// Persons per region code (`unknown` when absent)
    pub by_region: BTreeMap<String, usize>,
    /// Persons per fame tier
    pub by_fame_tier: BTreeMap<FameTier, usize>,
}

impl CoverageReport {
    /// Suggested fetch slices, one per gap range
    pub fn suggestions(&self) -> Vec<FetchSlice> {
        self.gaps.iter().map(|gap| gap.suggestion).collect()
    }

    /// Number of gap buckets
    pub fn gap_bucket_count(&self) -> usize {
        self.buckets.iter().filter(|b| b.level.is_gap()).count()
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Coverage Report".to_string(),
            "===============".to_string(),
            format!("Persons: {}", self.total_persons),
            format!("Centuries: {}", self.buckets.len()),
            format!("Gap centuries (< {}): {}", self.min_per_bucket, self.gap_bucket_count()),
        ];
        if self.outside_span > 0 {
            lines.push(format!("Outside span: {}", self.outside_span));
        }

        if !self.gaps.is_empty() {
            lines.push(String::new());
            lines.push("Gaps:".to_string());
            for gap in &self.gaps {
                lines.push(format!(
                    "  {}..={}: {} persons ({}), fetch with fame ≥ {}",
                    gap.start_year, gap.end_year, gap.total, gap.worst, gap.suggestion.min_fame
                ));
            }
        }

        lines.join("\n")
    }
}

/// Computes coverage statistics over a person set
pub struct CoverageAnalyzer {
    config: CoverageConfig,
}

impl CoverageAnalyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: CoverageConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &CoverageConfig {
        &self.config
    }

    /// Classify a bucket count
    pub fn classify(&self, count: usize) -> CoverageLevel {
        if count < self.config.critical_below {
            CoverageLevel::Critical
        } else if count < self.config.low_below {
            CoverageLevel::Low
        } else if count < self.config.min_per_bucket {
            CoverageLevel::Moderate
        } else {
            CoverageLevel::Good
        }
    }

    /// Analyze the person set
    pub fn analyze(&self, persons: &[Person]) -> CoverageReport {
        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        let mut by_domain: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_region: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_fame_tier: BTreeMap<FameTier, usize> = BTreeMap::new();

        for person in persons {
            *counts.entry(century_index(person.birth_year)).or_default() += 1;
            for domain in &person.domains {
                *by_domain.entry(domain.clone()).or_default() += 1;
            }
            let region = person.region.clone().unwrap_or_else(|| "unknown".to_string());
            *by_region.entry(region).or_default() += 1;
            *by_fame_tier.entry(FameTier::of(person.fame_score)).or_default() += 1;
        }

        let buckets = self.buckets(&counts);
        let in_span: usize = buckets.iter().map(|b| b.count).sum();
        let gaps = self.merge_gaps(&buckets);

        info!(
            persons = persons.len(),
            centuries = buckets.len(),
            gaps = gaps.len(),
            "Coverage analyzed"
        );

        CoverageReport {
            total_persons: persons.len(),
            min_per_bucket: self.config.min_per_bucket,
            outside_span: persons.len() - in_span,
            buckets,
            gaps,
            by_domain,
            by_region,
            by_fame_tier,
        }
    }

    fn buckets(&self, counts: &BTreeMap<i32, usize>) -> Vec<CenturyBucket> {
        let occupied_low = counts.keys().next().copied();
        let occupied_high = counts.keys().next_back().copied();

        let low = self.config.start_year.map(century_index).or(occupied_low);
        let high = self.config.end_year.map(century_index).or(occupied_high);
        let (Some(low), Some(high)) = (low, high) else {
            return Vec::new();
        };

        (low..=high)
            .filter_map(|century| {
                let count = counts.get(&century).copied().unwrap_or(0);
                if century == 0 && count == 0 {
                    return None;
                }
                let (start_year, end_year) = bucket_range(century);
                Some(CenturyBucket {
                    century,
                    start_year,
                    end_year,
                    count,
                    level: self.classify(count),
                })
            })
            .collect()
    }

    fn merge_gaps(&self, buckets: &[CenturyBucket]) -> Vec<GapRange> {
        let mut gaps: Vec<GapRange> = Vec::new();
        let mut extending = false;

        for bucket in buckets {
            if !bucket.level.is_gap() {
                extending = false;
                continue;
            }

            match gaps.last_mut() {
                Some(gap) if extending => {
                    gap.end_year = bucket.end_year;
                    gap.centuries.push(bucket.century);
                    gap.total += bucket.count;
                    gap.worst = gap.worst.min(bucket.level);
                }
                _ => gaps.push(GapRange {
                    start_year: bucket.start_year,
                    end_year: bucket.end_year,
                    centuries: vec![bucket.century],
                    total: bucket.count,
                    worst: bucket.level,
                    suggestion: FetchSlice::new(bucket.start_year, bucket.end_year, 0),
                }),
            }
            extending = true;
        }

        for gap in &mut gaps {
            gap.suggestion = FetchSlice::new(gap.start_year, gap.end_year, self.config.min_fame_for(gap.end_year));
        }
        gaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn born(id: usize, year: i32) -> Person {
        Person::new(format!("Q{}", id), format!("Person {}", id), year, "science", 10)
    }

    fn cohort(start_id: usize, year: i32, n: usize) -> Vec<Person> {
        (0..n).map(|i| born(start_id + i, year)).collect()
    }

    fn analyze(persons: &[Person]) -> CoverageReport {
        CoverageAnalyzer::new(CoverageConfig::default()).analyze(persons)
    }

    #[test]
    fn test_empty_set() {
        let report = analyze(&[]);
        assert!(report.buckets.is_empty());
        assert!(report.gaps.is_empty());
        assert_eq!(report.total_persons, 0);
    }

    #[test]
    fn test_classification() {
        let analyzer = CoverageAnalyzer::new(CoverageConfig::default());
        assert_eq!(analyzer.classify(0), CoverageLevel::Critical);
        assert_eq!(analyzer.classify(9), CoverageLevel::Critical);
        assert_eq!(analyzer.classify(10), CoverageLevel::Low);
        assert_eq!(analyzer.classify(25), CoverageLevel::Moderate);
        assert_eq!(analyzer.classify(30), CoverageLevel::Good);
    }

    #[test]
    fn test_empty_centuries_inside_span_are_zero() {
        let mut persons = cohort(0, 1450, 40);
        persons.extend(cohort(100, 1750, 40));
        let report = analyze(&persons);

        let centuries: Vec<i32> = report.buckets.iter().map(|b| b.century).collect();
        assert_eq!(centuries, vec![15, 16, 17, 18]);
        assert_eq!(report.buckets[1].count, 0);
        assert_eq!(report.buckets[1].level, CoverageLevel::Critical);

        assert_eq!(report.gaps.len(), 1);
        let gap = &report.gaps[0];
        assert_eq!((gap.start_year, gap.end_year), (1501, 1700));
        assert_eq!(gap.centuries, vec![16, 17]);
        assert_eq!(gap.suggestion, FetchSlice::new(1501, 1700, 40));
    }

    #[test]
    fn test_bucket_zero_only_when_occupied() {
        let persons = vec![born(1, -50), born(2, 50)];
        let centuries: Vec<i32> = analyze(&persons).buckets.iter().map(|b| b.century).collect();
        assert_eq!(centuries, vec![-1, 1]);

        let persons = vec![born(1, -50), born(2, 0), born(3, 50)];
        let centuries: Vec<i32> = analyze(&persons).buckets.iter().map(|b| b.century).collect();
        assert_eq!(centuries, vec![-1, 0, 1]);
    }

    #[test]
    fn test_negative_years() {
        let report = analyze(&[born(1, -150)]);
        assert_eq!(report.buckets[0].century, -2);
        assert_eq!((report.buckets[0].start_year, report.buckets[0].end_year), (-200, -101));
        assert_eq!(report.gaps[0].suggestion.min_fame, 10);
    }

    #[test]
    fn test_gaps_split_by_good_bucket() {
        let mut persons = cohort(0, 1150, 5);
        persons.extend(cohort(100, 1250, 35));
        persons.extend(cohort(200, 1350, 15));
        let report = analyze(&persons);

        assert_eq!(report.gaps.len(), 2);
        assert_eq!(report.gaps[0].worst, CoverageLevel::Critical);
        assert_eq!(report.gaps[1].worst, CoverageLevel::Low);
        assert_eq!(report.suggestions().len(), 2);
    }

    #[test]
    fn test_span_clamped_and_extended() {
        let config = CoverageConfig {
            start_year: Some(1701),
            end_year: Some(2000),
            ..Default::default()
        };
        let persons = vec![born(1, 1500), born(2, 1850)];
        let report = CoverageAnalyzer::new(config).analyze(&persons);

        let centuries: Vec<i32> = report.buckets.iter().map(|b| b.century).collect();
        assert_eq!(centuries, vec![18, 19, 20]);
        assert_eq!(report.outside_span, 1);
    }

    #[test]
    fn test_breakdowns() {
        let mut ada = Person::new("Q1", "Ada", 1815, "science", 250);
        ada.domains.insert("mathematics".to_string());
        ada.region = Some("GB".to_string());
        let grace = Person::new("Q2", "Grace", 1906, "science", 60);

        let report = analyze(&[ada, grace]);
        assert_eq!(report.by_domain["science"], 2);
        assert_eq!(report.by_domain["mathematics"], 1);
        assert_eq!(report.by_region["GB"], 1);
        assert_eq!(report.by_region["unknown"], 1);
        assert_eq!(report.by_fame_tier[&FameTier::Legendary], 1);
        assert_eq!(report.by_fame_tier[&FameTier::Notable], 1);
    }

    #[test]
    fn test_fame_tiers() {
        assert_eq!(FameTier::of(200), FameTier::Legendary);
        assert_eq!(FameTier::of(199), FameTier::Major);
        assert_eq!(FameTier::of(50), FameTier::Notable);
        assert_eq!(FameTier::of(20), FameTier::Minor);
        assert_eq!(FameTier::of(19), FameTier::Obscure);
        assert_eq!(FameTier::of(0), FameTier::Obscure);
    }

    #[test]
    fn test_report_json() {
        let report = analyze(&[born(1, 1815)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["buckets"][0]["level"], "critical");
        assert_eq!(json["gaps"][0]["suggestion"]["minFame"], 60);
        assert_eq!(json["byFameTier"]["obscure"], 1);
        assert!(report.summary().contains("Gaps:"));
    }
}
