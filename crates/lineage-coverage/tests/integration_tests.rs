//! Integration tests for lineage-coverage

use lineage_coverage::{CoverageAnalyzer, CoverageConfig, CoverageLevel, FameTier};
use lineage_domain::{FetchSlice, Person};

fn born(id: &str, year: i32) -> Person {
    Person::new(id, id, year, "philosophy", 25)
}

fn analyzer(min_per_bucket: usize) -> CoverageAnalyzer {
    CoverageAnalyzer::new(CoverageConfig {
        min_per_bucket,
        low_below: min_per_bucket.min(20),
        critical_below: min_per_bucket.min(10),
        ..Default::default()
    })
}

#[test]
fn test_sparse_century_is_critical_with_suggested_range() {
    let persons: Vec<Person> = (0..8).map(|i| born(&format!("P{}", i), -700 + i * 10)).collect();

    let report = analyzer(10).analyze(&persons);

    assert_eq!(report.buckets.len(), 1);
    assert_eq!(report.buckets[0].century, -7);
    assert_eq!(report.buckets[0].level, CoverageLevel::Critical);
    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.gaps[0].suggestion, FetchSlice::new(-700, -601, 5));
}

#[test]
fn test_years_around_zero_fill_three_buckets() {
    let persons = vec![born("minus", -1), born("zero", 0), born("plus", 1)];

    let report = analyzer(1).analyze(&persons);

    let centuries: Vec<i32> = report.buckets.iter().map(|b| b.century).collect();
    assert_eq!(centuries, vec![-1, 0, 1]);
    assert!(report.gaps.is_empty());
}

#[test]
fn test_empty_centuries_inside_the_span_are_gaps() {
    let mut persons: Vec<Person> = (0..5).map(|i| born(&format!("A{}", i), 1801 + i)).collect();
    persons.extend((0..5).map(|i| born(&format!("B{}", i), 2001 + i)));

    let report = analyzer(5).analyze(&persons);

    assert_eq!(report.buckets.len(), 3);
    assert_eq!(report.buckets[1].count, 0);
    assert_eq!(report.gaps.len(), 1);
    assert_eq!((report.gaps[0].start_year, report.gaps[0].end_year), (1901, 2000));
    assert_eq!(report.gaps[0].suggestion.min_fame, 60);
}

#[test]
fn test_breakdowns() {
    let mut famous = Person::new("Q1", "Famous", 1900, "science", 250);
    famous.region = Some("FR".to_string());
    let obscure = Person::new("Q2", "Obscure", 1910, "music", 3);

    let report = analyzer(1).analyze(&[famous, obscure]);

    assert_eq!(report.by_region.get("FR"), Some(&1));
    assert_eq!(report.by_region.get("unknown"), Some(&1));
    assert_eq!(report.by_domain.get("music"), Some(&1));
    assert_eq!(report.by_fame_tier.get(&FameTier::Legendary), Some(&1));
    assert_eq!(report.by_fame_tier.get(&FameTier::Obscure), Some(&1));
}
