//! Dataset integrity validation

use crate::IntegrityConfig;
use lineage_domain::{normalize_name, EdgeRecord, PersonRecord, RawGraph};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use tracing::{info, warn};

/// Severity of an integrity issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth a look; does not break the dataset
    Warning,
    /// Breaks an invariant of the dataset
    Critical,
}

/// Machine-readable issue code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCode {
    /// Identifier occurs more than once
    DuplicateId,
    /// Normalized name shared by distinct identifiers
    DuplicateName,
    /// Required field missing or empty
    MissingField,
    /// Fame score below zero
    NegativeFame,
    /// Birth year outside the configured range
    BirthOutOfRange,
    /// Death year before birth year
    DiedBeforeBorn,
    /// Lifespan above the configured maximum
    LifespanExceeded,
    /// Fame score below the configured minimum
    LowFame,
    /// Graph key with no matching person
    OrphanedEdge,
    /// Edge with missing fields or out-of-range confidence
    MalformedEdge,
    /// Edge target matching neither an identifier nor a name
    UnresolvedTarget,
    /// Edge target name matching several persons
    AmbiguousTarget,
    /// Edge target stored by name that resolves to one person
    NameKeyedTarget,
    /// Same target and nature stored twice under one source
    DuplicateEdge,
}

impl IssueCode {
    /// Severity attached to this code
    pub fn severity(self) -> Severity {
        match self {
            IssueCode::DuplicateName
            | IssueCode::LowFame
            | IssueCode::AmbiguousTarget
            | IssueCode::NameKeyedTarget => Severity::Warning,
            _ => Severity::Critical,
        }
    }

    /// Code as it appears in reports
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::DuplicateId => "duplicate-id",
            IssueCode::DuplicateName => "duplicate-name",
            IssueCode::MissingField => "missing-field",
            IssueCode::NegativeFame => "negative-fame",
            IssueCode::BirthOutOfRange => "birth-out-of-range",
            IssueCode::DiedBeforeBorn => "died-before-born",
            IssueCode::LifespanExceeded => "lifespan-exceeded",
            IssueCode::LowFame => "low-fame",
            IssueCode::OrphanedEdge => "orphaned-edge",
            IssueCode::MalformedEdge => "malformed-edge",
            IssueCode::UnresolvedTarget => "unresolved-target",
            IssueCode::AmbiguousTarget => "ambiguous-target",
            IssueCode::NameKeyedTarget => "name-keyed-target",
            IssueCode::DuplicateEdge => "duplicate-edge",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All occurrences of one issue code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Issue code
    pub code: IssueCode,

    /// Severity of the code
    pub severity: Severity,

    /// Number of occurrences
    pub count: usize,

    /// First occurrences, bounded by `max_examples`
    pub examples: Vec<String>,
}

/// Result of an integrity scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    /// Whether the dataset has no critical issues
    pub well_formed: bool,

    /// Person records scanned
    pub persons_checked: usize,

    /// Graph keys scanned
    pub sources_checked: usize,

    /// Edges scanned
    pub edges_checked: usize,

    /// Issues found, ordered by code
    pub issues: Vec<Issue>,
}

impl IntegrityReport {
    /// Whether the dataset has no critical issues
    pub fn is_well_formed(&self) -> bool {
        self.critical_count() == 0
    }

    /// Total critical occurrences
    pub fn critical_count(&self) -> usize {
        self.count_with(Severity::Critical)
    }

    /// Total warning occurrences
    pub fn warning_count(&self) -> usize {
        self.count_with(Severity::Warning)
    }

    /// Issue entry for a code, if it occurred
    pub fn issue(&self, code: IssueCode) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.code == code)
    }

    /// Occurrences of a code
    pub fn count(&self, code: IssueCode) -> usize {
        self.issue(code).map_or(0, |issue| issue.count)
    }

    fn count_with(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .map(|issue| issue.count)
            .sum()
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Integrity Report:\n\
             - Persons checked: {}\n\
             - Edge sources checked: {}\n\
             - Edges checked: {}\n\
             - Critical: {}\n\
             - Warnings: {}",
            self.persons_checked,
            self.sources_checked,
            self.edges_checked,
            self.critical_count(),
            self.warning_count(),
        );
        for issue in &self.issues {
            text.push_str(&format!("\n  [{:?}] {}: {}", issue.severity, issue.code, issue.count));
        }
        text
    }
}

/// Accumulates occurrences per code while scanning
struct Tally {
    max_examples: usize,
    issues: BTreeMap<IssueCode, (usize, Vec<String>)>,
}

impl Tally {
    fn new(max_examples: usize) -> Self {
        Self {
            max_examples,
            issues: BTreeMap::new(),
        }
    }

    fn flag(&mut self, code: IssueCode, example: impl FnOnce() -> String) {
        let (count, examples) = self.issues.entry(code).or_default();
        *count += 1;
        if examples.len() < self.max_examples {
            examples.push(example());
        }
    }

    fn into_issues(self) -> Vec<Issue> {
        self.issues
            .into_iter()
            .map(|(code, (count, examples))| Issue {
                code,
                severity: code.severity(),
                count,
                examples,
            })
            .collect()
    }
}

/// The Gatekeeper scans persisted data for integrity issues
pub struct Gatekeeper {
    config: IntegrityConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: IntegrityConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(IntegrityConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &IntegrityConfig {
        &self.config
    }

    /// Scan the person records and the raw relation graph
    ///
    /// Never mutates anything and never fails: every problem found is an
    /// issue in the returned report.
    pub fn validate(&self, records: &[PersonRecord], graph: &RawGraph) -> IntegrityReport {
        let mut tally = Tally::new(self.config.max_examples);

        // 1. Per-record field checks
        for (index, record) in records.iter().enumerate() {
            self.check_record(index, record, &mut tally);
        }

        // 2. Identity checks across the set
        self.check_identities(records, &mut tally);

        // 3. Graph checks
        let lookup = Lookup::new(records);
        let mut edges_checked = 0;
        for (source, edges) in graph {
            if self.config.check_orphaned_edges && !lookup.ids.contains_key(source.as_str()) {
                tally.flag(IssueCode::OrphanedEdge, || format!("{} ({} edges)", source, edges.len()));
            }
            for edge in edges {
                edges_checked += 1;
                self.check_edge(source, edge, &lookup, &mut tally);
            }
            if self.config.check_duplicate_edges {
                check_duplicate_edges(source, edges, &lookup, &mut tally);
            }
        }

        let issues = tally.into_issues();
        let report = IntegrityReport {
            well_formed: !issues.iter().any(|i| i.severity == Severity::Critical),
            persons_checked: records.len(),
            sources_checked: graph.len(),
            edges_checked,
            issues,
        };

        if report.is_well_formed() {
            info!(
                persons = report.persons_checked,
                edges = report.edges_checked,
                warnings = report.warning_count(),
                "Dataset is well-formed"
            );
        } else {
            warn!(
                persons = report.persons_checked,
                edges = report.edges_checked,
                critical = report.critical_count(),
                warnings = report.warning_count(),
                "Dataset has critical integrity issues"
            );
        }
        report
    }

    fn check_record(&self, index: usize, record: &PersonRecord, tally: &mut Tally) {
        let label = || record_label(index, record);

        if self.config.check_required_fields {
            let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());
            let no_domains = record
                .domains
                .as_ref()
                .map_or(true, |domains| domains.iter().all(|d| d.trim().is_empty()));

            let missing = [
                ("id", blank(&record.id)),
                ("name", blank(&record.name)),
                ("birthYear", record.birth_year.is_none()),
                ("domains", no_domains),
                ("fameScore", record.fame_score.is_none()),
            ];
            for (field, is_missing) in missing {
                if is_missing {
                    tally.flag(IssueCode::MissingField, || format!("{}: {}", label(), field));
                }
            }
        }

        if let Some(fame) = record.fame_score {
            if self.config.check_negative_fame && fame < 0 {
                tally.flag(IssueCode::NegativeFame, || format!("{}: {}", label(), fame));
            } else if self.config.check_low_fame && fame >= 0 && fame < self.config.min_fame_score {
                tally.flag(IssueCode::LowFame, || format!("{}: {}", label(), fame));
            }
        }

        if !self.config.check_dates {
            return;
        }
        let Some(birth) = record.birth_year else {
            return;
        };
        if birth < self.config.min_birth_year || birth > self.config.max_birth_year {
            tally.flag(IssueCode::BirthOutOfRange, || format!("{}: {}", label(), birth));
        }
        if let Some(death) = record.death_year {
            if death < birth {
                tally.flag(IssueCode::DiedBeforeBorn, || format!("{}: {}–{}", label(), birth, death));
            } else {
                let span = i128::from(death) - i128::from(birth);
                if span > i128::from(self.config.max_lifespan) {
                    tally.flag(IssueCode::LifespanExceeded, || format!("{}: {} years", label(), span));
                }
            }
        }
    }

    fn check_identities(&self, records: &[PersonRecord], tally: &mut Tally) {
        let mut id_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut names: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();

        for record in records {
            let Some(id) = record.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) else {
                continue;
            };
            *id_counts.entry(id).or_default() += 1;
            if let Some(name) = record.name.as_deref() {
                let key = normalize_name(name);
                if !key.is_empty() {
                    names.entry(key).or_default().insert(id);
                }
            }
        }

        if self.config.check_duplicate_ids {
            for (id, count) in id_counts.iter().filter(|(_, count)| **count > 1) {
                tally.flag(IssueCode::DuplicateId, || format!("{} (×{})", id, count));
            }
        }

        if self.config.check_duplicate_names {
            for (name, ids) in names.iter().filter(|(_, ids)| ids.len() > 1) {
                tally.flag(IssueCode::DuplicateName, || {
                    format!("{}: {}", name, ids.iter().copied().collect::<Vec<_>>().join(", "))
                });
            }
        }
    }

    fn check_edge(&self, source: &str, edge: &EdgeRecord, lookup: &Lookup<'_>, tally: &mut Tally) {
        let target = edge.target.as_deref().map(str::trim).filter(|t| !t.is_empty());

        if self.config.check_malformed_edges {
            let problem = if target.is_none() {
                Some("missing target".to_string())
            } else if edge.nature.as_deref().map_or(true, |n| n.trim().is_empty()) {
                Some("missing nature".to_string())
            } else {
                match edge.confidence {
                    None => Some("missing confidence".to_string()),
                    Some(c) if !(c > 0.0 && c <= 1.0) => Some(format!("confidence {}", c)),
                    Some(_) => None,
                }
            };
            if let Some(problem) = problem {
                tally.flag(IssueCode::MalformedEdge, || format!("{} → {}: {}", source, target.unwrap_or("?"), problem));
            }
        }

        let Some(target) = target else {
            return;
        };
        if lookup.ids.contains_key(target) {
            return;
        }

        match lookup.names.get(target).map_or(0, BTreeSet::len) {
            0 if self.config.check_edge_targets => {
                tally.flag(IssueCode::UnresolvedTarget, || format!("{} → {}", source, target));
            }
            1 if self.config.check_name_keyed_targets => {
                tally.flag(IssueCode::NameKeyedTarget, || format!("{} → {}", source, target));
            }
            n if n > 1 && self.config.check_edge_targets => {
                tally.flag(IssueCode::AmbiguousTarget, || format!("{} → {} ({} matches)", source, target, n));
            }
            _ => {}
        }
    }
}

/// Flag edges repeating an earlier (target, nature) pair of the same source
///
/// Targets are compared by display name, so an id-keyed edge and a legacy
/// name-keyed edge to the same person count as one relation.
fn check_duplicate_edges(source: &str, edges: &[EdgeRecord], lookup: &Lookup<'_>, tally: &mut Tally) {
    let mut seen: BTreeSet<(&str, &str)> = BTreeSet::new();
    for edge in edges {
        let (Some(target), Some(nature)) = (
            edge.target.as_deref().map(str::trim).filter(|t| !t.is_empty()),
            edge.nature.as_deref().map(str::trim).filter(|n| !n.is_empty()),
        ) else {
            continue;
        };
        if !seen.insert((lookup.display_name(target), nature)) {
            tally.flag(IssueCode::DuplicateEdge, || format!("{} → {} ({})", source, target, nature));
        }
    }
}

/// Identifier and exact-name lookup over raw records
struct Lookup<'r> {
    /// Identifier → trimmed name (empty when the record has none)
    ids: BTreeMap<&'r str, &'r str>,
    names: HashMap<&'r str, BTreeSet<&'r str>>,
}

impl<'r> Lookup<'r> {
    fn new(records: &'r [PersonRecord]) -> Self {
        let mut ids = BTreeMap::new();
        let mut names: HashMap<&str, BTreeSet<&str>> = HashMap::new();

        for record in records {
            let Some(id) = record.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) else {
                continue;
            };
            let name = record.name.as_deref().map(str::trim).unwrap_or_default();
            ids.entry(id).or_insert(name);
            if !name.is_empty() {
                names.entry(name).or_default().insert(id);
            }
        }

        Self { ids, names }
    }

    /// Name shown for an edge target: the person's name for a known id,
    /// otherwise the target as stored
    fn display_name<'a>(&'a self, target: &'a str) -> &'a str {
        match self.ids.get(target) {
            Some(name) if !name.is_empty() => *name,
            _ => target,
        }
    }
}

fn record_label(index: usize, record: &PersonRecord) -> String {
    match record.id.as_deref() {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => format!("#{}", index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> PersonRecord {
        PersonRecord::new("Q1", "Ada").with_birth_year(1815).with_death_year(1852).with_domain("science").with_fame(140)
    }

    fn grace() -> PersonRecord {
        PersonRecord::new("Q2", "Grace").with_birth_year(1906).with_domain("science").with_fame(90)
    }

    fn edge(target: &str, nature: &str, confidence: f64) -> EdgeRecord {
        EdgeRecord {
            target: Some(target.to_string()),
            nature: Some(nature.to_string()),
            confidence: Some(confidence),
        }
    }

    fn validate(records: &[PersonRecord], graph: &RawGraph) -> IntegrityReport {
        Gatekeeper::default_config().validate(records, graph)
    }

    #[test]
    fn test_clean_dataset() {
        let graph = RawGraph::from([("Q1".to_string(), vec![edge("Q2", "influenced", 0.5)])]);
        let report = validate(&[ada(), grace()], &graph);

        assert!(report.is_well_formed());
        assert!(report.well_formed);
        assert!(report.issues.is_empty());
        assert_eq!(report.edges_checked, 1);
    }

    #[test]
    fn test_lifespan_exceeded() {
        let old = ada().with_death_year(1990);
        let report = validate(&[old], &RawGraph::new());

        assert_eq!(report.count(IssueCode::LifespanExceeded), 1);
        assert!(!report.is_well_formed());
    }

    #[test]
    fn test_died_before_born() {
        let report = validate(&[ada().with_death_year(1800)], &RawGraph::new());
        assert_eq!(report.count(IssueCode::DiedBeforeBorn), 1);
        assert_eq!(report.count(IssueCode::LifespanExceeded), 0);
    }

    #[test]
    fn test_extreme_death_year_is_flagged_not_overflowed() {
        let record = ada().with_birth_year(-10).with_death_year(i64::MAX);
        let report = validate(&[record], &RawGraph::new());

        assert_eq!(report.count(IssueCode::LifespanExceeded), 1);
        assert_eq!(report.count(IssueCode::DiedBeforeBorn), 0);
        assert!(!report.is_well_formed());

        let reversed = ada().with_birth_year(i64::MAX).with_death_year(i64::MIN);
        let report = validate(&[reversed], &RawGraph::new());
        assert_eq!(report.count(IssueCode::DiedBeforeBorn), 1);
    }

    #[test]
    fn test_duplicate_edges_flagged_across_id_and_name() {
        let graph = RawGraph::from([(
            "Q1".to_string(),
            vec![
                edge("Q2", "influenced", 0.5),
                edge("Grace", "influenced", 0.7),
                edge("Q2", "teacher", 0.9),
                edge("Q2", "influenced", 0.4),
            ],
        )]);
        let report = validate(&[ada(), grace()], &graph);

        assert_eq!(report.count(IssueCode::DuplicateEdge), 2);
        assert_eq!(report.issue(IssueCode::DuplicateEdge).unwrap().severity, Severity::Critical);
        assert!(!report.is_well_formed());

        let config = IntegrityConfig {
            check_duplicate_edges: false,
            ..Default::default()
        };
        let report = Gatekeeper::new(config).validate(&[ada(), grace()], &graph);
        assert_eq!(report.count(IssueCode::DuplicateEdge), 0);
    }

    #[test]
    fn test_living_person_has_no_lifespan_issue() {
        let report = validate(&[grace()], &RawGraph::new());
        assert!(report.is_well_formed());
    }

    #[test]
    fn test_birth_out_of_range() {
        let report = validate(&[grace().with_birth_year(2300)], &RawGraph::new());
        assert_eq!(report.count(IssueCode::BirthOutOfRange), 1);
    }

    #[test]
    fn test_missing_fields_counted_per_field() {
        let record = PersonRecord {
            id: Some("Q3".into()),
            ..Default::default()
        };
        let report = validate(&[record], &RawGraph::new());
        // name, birthYear, domains, fameScore
        assert_eq!(report.count(IssueCode::MissingField), 4);
        assert_eq!(report.issue(IssueCode::MissingField).unwrap().examples[0], "Q3: name");
    }

    #[test]
    fn test_negative_and_low_fame() {
        let config = IntegrityConfig {
            min_fame_score: 50,
            ..Default::default()
        };
        let report = Gatekeeper::new(config).validate(&[ada().with_fame(-1), grace().with_fame(10)], &RawGraph::new());
        assert_eq!(report.count(IssueCode::NegativeFame), 1);
        assert_eq!(report.count(IssueCode::LowFame), 1);
        assert_eq!(report.issue(IssueCode::LowFame).unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_duplicate_ids_and_names() {
        let twin = PersonRecord::new("Q7", " ada ").with_birth_year(1900).with_domain("art").with_fame(1);
        let report = validate(&[ada(), ada(), twin], &RawGraph::new());

        assert_eq!(report.count(IssueCode::DuplicateId), 1);
        assert_eq!(report.count(IssueCode::DuplicateName), 1);
        assert_eq!(report.issue(IssueCode::DuplicateName).unwrap().examples[0], "ada: Q1, Q7");
    }

    #[test]
    fn test_orphaned_edge() {
        let graph = RawGraph::from([("Q9".to_string(), vec![edge("Q1", "teacher", 1.0)])]);
        let report = validate(&[ada()], &graph);

        assert_eq!(report.count(IssueCode::OrphanedEdge), 1);
        assert!(!report.is_well_formed());
    }

    #[test]
    fn test_malformed_edges() {
        let graph = RawGraph::from([(
            "Q1".to_string(),
            vec![
                EdgeRecord { target: Some("Q2".into()), ..Default::default() },
                edge("Q2", "teacher", 0.0),
                edge("Q2", " ", 0.5),
                EdgeRecord::default(),
            ],
        )]);
        let report = validate(&[ada(), grace()], &graph);
        assert_eq!(report.count(IssueCode::MalformedEdge), 4);
    }

    #[test]
    fn test_target_resolution_codes() {
        let namesake = PersonRecord::new("Q8", "Grace").with_birth_year(1950).with_domain("music").with_fame(5);
        let graph = RawGraph::from([(
            "Q1".to_string(),
            vec![edge("Nobody", "teacher", 1.0), edge("Grace", "influenced", 0.5), edge("Ada", "self", 0.5)],
        )]);
        let report = validate(&[ada(), grace(), namesake], &graph);

        assert_eq!(report.count(IssueCode::UnresolvedTarget), 1);
        assert_eq!(report.count(IssueCode::AmbiguousTarget), 1);
        assert_eq!(report.count(IssueCode::NameKeyedTarget), 1);
        assert_eq!(report.critical_count(), 1);
    }

    #[test]
    fn test_examples_are_bounded() {
        let config = IntegrityConfig {
            max_examples: 2,
            ..Default::default()
        };
        let records: Vec<PersonRecord> = (0..5).map(|_| ada().with_fame(-5)).collect();
        let report = Gatekeeper::new(config).validate(&records, &RawGraph::new());

        let issue = report.issue(IssueCode::NegativeFame).unwrap();
        assert_eq!(issue.count, 5);
        assert_eq!(issue.examples.len(), 2);
    }

    #[test]
    fn test_checks_can_be_disabled() {
        let config = IntegrityConfig {
            check_dates: false,
            check_orphaned_edges: false,
            ..Default::default()
        };
        let graph = RawGraph::from([("Q9".to_string(), vec![edge("Q1", "teacher", 1.0)])]);
        let report = Gatekeeper::new(config).validate(&[ada().with_death_year(1990)], &graph);
        assert!(report.is_well_formed());
    }

    #[test]
    fn test_report_serializes_codes() {
        let report = validate(&[ada().with_death_year(1800)], &RawGraph::new());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["wellFormed"], false);
        assert_eq!(json["issues"][0]["code"], "died-before-born");
        assert_eq!(json["issues"][0]["severity"], "critical");
        assert!(report.summary().contains("died-before-born: 1"));
    }
}
