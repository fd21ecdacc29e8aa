//! Relation graph builder
//!
//! Adds typed edges to the relation graph without ever creating a
//! dangling reference or a duplicate. New edges store the target's
//! identifier; duplicates are detected by display name so that legacy
//! edges keyed by name still count.

use lineage_domain::{
    CandidateEdge, HonorGroup, Person, PersonIndex, RelationEdge, RelationGraph,
    TargetResolution, ValidationError,
};
use serde::Serialize;
use std::ops::AddAssign;
use tracing::{debug, info, warn};

/// Nature tag for co-occurrence edges unless configured otherwise
pub const DEFAULT_COOCCURRENCE_NATURE: &str = "co-honoree";

/// Counters for one graph-building run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EdgeStats {
    /// Edges appended
    pub added: usize,

    /// Source or target is not in the person set
    pub skipped_missing_endpoint: usize,

    /// Same (source, target name, nature) already present
    pub skipped_duplicate: usize,

    /// Target name matches several persons
    pub skipped_ambiguous_target: usize,

    /// Blank nature, confidence outside (0, 1], or a self-edge
    pub rejected_invalid: usize,
}

impl EdgeStats {
    /// Total candidate edges processed
    pub fn total(&self) -> usize {
        self.added
            + self.skipped_missing_endpoint
            + self.skipped_duplicate
            + self.skipped_ambiguous_target
            + self.rejected_invalid
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Edge Statistics:\n\
             - Processed: {}\n\
             - Added: {}\n\
             - Skipped (missing endpoint): {}\n\
             - Skipped (duplicate): {}\n\
             - Skipped (ambiguous target): {}\n\
             - Rejected (invalid): {}",
            self.total(),
            self.added,
            self.skipped_missing_endpoint,
            self.skipped_duplicate,
            self.skipped_ambiguous_target,
            self.rejected_invalid,
        )
    }
}

impl AddAssign for EdgeStats {
    fn add_assign(&mut self, other: Self) {
        self.added += other.added;
        self.skipped_missing_endpoint += other.skipped_missing_endpoint;
        self.skipped_duplicate += other.skipped_duplicate;
        self.skipped_ambiguous_target += other.skipped_ambiguous_target;
        self.rejected_invalid += other.rejected_invalid;
    }
}

/// What happened to a single edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeFate {
    Added,
    MissingEndpoint,
    Duplicate,
    Ambiguous,
    Invalid,
}

impl EdgeStats {
    fn record(&mut self, fate: EdgeFate) {
        match fate {
            EdgeFate::Added => self.added += 1,
            EdgeFate::MissingEndpoint => self.skipped_missing_endpoint += 1,
            EdgeFate::Duplicate => self.skipped_duplicate += 1,
            EdgeFate::Ambiguous => self.skipped_ambiguous_target += 1,
            EdgeFate::Invalid => self.rejected_invalid += 1,
        }
    }
}

/// Builds the relation graph on top of a person set
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    cooccurrence_nature: String,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Create a builder with the default co-occurrence nature
    pub fn new() -> Self {
        Self {
            cooccurrence_nature: DEFAULT_COOCCURRENCE_NATURE.to_string(),
        }
    }

    /// Use a different nature tag for co-occurrence edges
    pub fn with_cooccurrence_nature(mut self, nature: impl Into<String>) -> Self {
        self.cooccurrence_nature = nature.into();
        self
    }

    /// Nature tag used for co-occurrence edges
    pub fn cooccurrence_nature(&self) -> &str {
        &self.cooccurrence_nature
    }

    /// Add candidate edges to the graph
    pub fn add_edges(
        &self,
        mut graph: RelationGraph,
        persons: &[Person],
        candidates: &[CandidateEdge],
    ) -> (RelationGraph, EdgeStats) {
        let index = PersonIndex::new(persons);
        let mut stats = EdgeStats::default();

        for candidate in candidates {
            let fate = add_one(&mut graph, &index, candidate);
            if fate != EdgeFate::Added {
                debug!(
                    source = %candidate.source,
                    target = %candidate.target,
                    nature = %candidate.nature,
                    fate = ?fate,
                    "Edge not added"
                );
            }
            stats.record(fate);
        }

        info!(
            added = stats.added,
            missing = stats.skipped_missing_endpoint,
            duplicate = stats.skipped_duplicate,
            ambiguous = stats.skipped_ambiguous_target,
            invalid = stats.rejected_invalid,
            "Edges processed"
        );
        (graph, stats)
    }

    /// Expand honor groups into pairwise co-occurrence edges
    ///
    /// Each group of `n` distinct resolved members contributes up to
    /// `n × (n − 1)` directed edges with confidence 1.0.
    pub fn add_cooccurrence(
        &self,
        mut graph: RelationGraph,
        persons: &[Person],
        groups: &[HonorGroup],
    ) -> (RelationGraph, EdgeStats) {
        let index = PersonIndex::new(persons);
        let mut stats = EdgeStats::default();

        for group in groups {
            let mut members: Vec<&Person> = Vec::with_capacity(group.members.len());
            for reference in &group.members {
                match index.resolve(reference.trim()) {
                    TargetResolution::ById(person) | TargetResolution::ByName(person) => {
                        if !members.iter().any(|m| m.id == person.id) {
                            members.push(person);
                        }
                    }
                    TargetResolution::Ambiguous(_) => {
                        warn!(honor = %group.honor, member = %reference, "Ambiguous honor group member");
                        stats.record(EdgeFate::Ambiguous);
                    }
                    TargetResolution::Unknown => {
                        warn!(honor = %group.honor, member = %reference, "Unknown honor group member");
                        stats.record(EdgeFate::MissingEndpoint);
                    }
                }
            }

            for source in &members {
                for target in &members {
                    if source.id == target.id {
                        continue;
                    }
                    let fate = insert(&mut graph, &index, source, target, &self.cooccurrence_nature, 1.0);
                    stats.record(fate);
                }
            }
            debug!(honor = %group.honor, year = ?group.year, members = members.len(), "Expanded honor group");
        }

        info!(
            groups = groups.len(),
            added = stats.added,
            duplicate = stats.skipped_duplicate,
            missing = stats.skipped_missing_endpoint,
            ambiguous = stats.skipped_ambiguous_target,
            "Co-occurrence edges processed"
        );
        (graph, stats)
    }
}

/// Structural check independent of the person set
fn check_edge(nature: &str, confidence: f64) -> Result<(), ValidationError> {
    if nature.trim().is_empty() {
        return Err(ValidationError::BlankField("nature"));
    }
    if !(confidence > 0.0 && confidence <= 1.0) {
        return Err(ValidationError::InvalidConfidence(confidence));
    }
    Ok(())
}

fn add_one(graph: &mut RelationGraph, index: &PersonIndex<'_>, candidate: &CandidateEdge) -> EdgeFate {
    if check_edge(&candidate.nature, candidate.confidence).is_err() {
        return EdgeFate::Invalid;
    }
    let (source_ref, target_ref) = (candidate.source.trim(), candidate.target.trim());
    if source_ref == target_ref {
        return EdgeFate::Invalid;
    }

    let target = match index.resolve(target_ref) {
        TargetResolution::ById(person) | TargetResolution::ByName(person) => person,
        TargetResolution::Ambiguous(_) => return EdgeFate::Ambiguous,
        TargetResolution::Unknown => return EdgeFate::MissingEndpoint,
    };
    let source = match index.resolve(source_ref) {
        TargetResolution::ById(person) | TargetResolution::ByName(person) => person,
        TargetResolution::Ambiguous(_) => return EdgeFate::Ambiguous,
        TargetResolution::Unknown => return EdgeFate::MissingEndpoint,
    };

    if source.id == target.id {
        return EdgeFate::Invalid;
    }

    insert(graph, index, source, target, candidate.nature.trim(), candidate.confidence)
}

fn insert(
    graph: &mut RelationGraph,
    index: &PersonIndex<'_>,
    source: &Person,
    target: &Person,
    nature: &str,
    confidence: f64,
) -> EdgeFate {
    let duplicate = graph.edges(&source.id).iter().any(|edge| {
        edge.nature == nature && RelationGraph::display_target(index, &edge.target) == target.name
    });
    if duplicate {
        return EdgeFate::Duplicate;
    }

    graph.push(source.id.clone(), RelationEdge::new(target.id.as_str(), nature, confidence));
    EdgeFate::Added
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_domain::PersonId;
    use proptest::prelude::*;

    fn persons() -> Vec<Person> {
        vec![
            Person::new("X1", "Ada", 1815, "science", 140),
            Person::new("X2", "Charles", 1791, "science", 120),
            Person::new("X3", "Mary", 1797, "literature", 110),
            Person::new("X4", "John Smith", 1900, "art", 10),
            Person::new("X5", "John Smith", 1920, "music", 12),
        ]
    }

    fn add(graph: RelationGraph, candidates: &[CandidateEdge]) -> (RelationGraph, EdgeStats) {
        GraphBuilder::new().add_edges(graph, &persons(), candidates)
    }

    #[test]
    fn test_edge_added_by_id_and_name() {
        let (graph, stats) = add(
            RelationGraph::new(),
            &[
                CandidateEdge::new("X1", "X2", "collaborator", 0.9),
                CandidateEdge::new("X2", "Mary", "contemporary", 0.4),
            ],
        );

        assert_eq!(stats.added, 2);
        // Name targets are stored as identifiers
        assert_eq!(graph.edges(&PersonId::new("X2"))[0].target, "X3");
    }

    #[test]
    fn test_missing_endpoint_skipped() {
        let (graph, stats) = add(
            RelationGraph::new(),
            &[
                CandidateEdge::new("X1", "Nobody", "teacher", 1.0),
                CandidateEdge::new("X9", "X1", "teacher", 1.0),
            ],
        );
        assert_eq!(stats.skipped_missing_endpoint, 2);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_duplicate_suppressed() {
        let edge = CandidateEdge::new("X1", "X2", "collaborator", 0.9);
        let (graph, _) = add(RelationGraph::new(), &[edge.clone()]);
        let (graph, stats) = add(graph, &[edge, CandidateEdge::new("X1", "Charles", "collaborator", 0.5)]);

        assert_eq!(stats.skipped_duplicate, 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_legacy_name_edge_counts_as_duplicate() {
        let mut graph = RelationGraph::new();
        graph.push(PersonId::new("X1"), RelationEdge::new("Charles", "collaborator", 0.9));

        let (graph, stats) = add(graph, &[CandidateEdge::new("X1", "X2", "collaborator", 0.9)]);
        assert_eq!(stats.skipped_duplicate, 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_same_target_different_nature_allowed() {
        let (graph, stats) = add(
            RelationGraph::new(),
            &[
                CandidateEdge::new("X1", "X2", "collaborator", 0.9),
                CandidateEdge::new("X1", "X2", "friend", 0.7),
            ],
        );
        assert_eq!(stats.added, 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_ambiguous_target_skipped() {
        let (graph, stats) = add(RelationGraph::new(), &[CandidateEdge::new("X1", "John Smith", "influenced", 0.5)]);
        assert_eq!(stats.skipped_ambiguous_target, 1);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_invalid_edges_rejected() {
        let (graph, stats) = add(
            RelationGraph::new(),
            &[
                CandidateEdge::new("X1", "X1", "self", 1.0),
                CandidateEdge::new("X1", "Ada", "self", 1.0),
                CandidateEdge::new("X1", "X2", " ", 1.0),
                CandidateEdge::new("X1", "X2", "teacher", 0.0),
                CandidateEdge::new("X1", "X2", "teacher", 1.5),
                CandidateEdge::new("X1", "X2", "teacher", f64::NAN),
            ],
        );
        assert_eq!(stats.rejected_invalid, 6);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_cooccurrence_expansion() {
        let group = HonorGroup {
            honor: "Royal Medal".to_string(),
            year: Some(1850),
            members: vec!["X1".into(), "Charles".into(), "X3".into(), "X1".into(), "Ghost".into()],
        };
        let (graph, stats) = GraphBuilder::new().add_cooccurrence(RelationGraph::new(), &persons(), &[group.clone()]);

        assert_eq!(stats.added, 6);
        assert_eq!(stats.skipped_missing_endpoint, 1);
        assert_eq!(graph.edges(&PersonId::new("X1"))[0].nature, "co-honoree");
        assert_eq!(graph.edges(&PersonId::new("X1"))[0].confidence, 1.0);

        // Re-expanding adds nothing
        let (graph, stats) = GraphBuilder::new().add_cooccurrence(graph, &persons(), &[group]);
        assert_eq!(stats.added, 0);
        assert_eq!(stats.skipped_duplicate, 6);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn test_cooccurrence_custom_nature() {
        let group = HonorGroup {
            honor: "Prize".to_string(),
            year: None,
            members: vec!["X1".into(), "X2".into()],
        };
        let builder = GraphBuilder::new().with_cooccurrence_nature("co-laureate");
        let (graph, _) = builder.add_cooccurrence(RelationGraph::new(), &persons(), &[group]);
        assert_eq!(graph.edges(&PersonId::new("X2"))[0].nature, "co-laureate");
    }

    #[test]
    fn test_stats_accumulate() {
        let mut total = EdgeStats { added: 1, ..Default::default() };
        total += EdgeStats { added: 2, skipped_duplicate: 1, ..Default::default() };
        assert_eq!(total.added, 3);
        assert_eq!(total.total(), 4);
        assert!(total.summary().contains("Added: 3"));
    }

    proptest! {
        #[test]
        fn prop_cooccurrence_yields_n_times_n_minus_one(n in 0usize..12) {
            let persons: Vec<Person> = (0..n)
                .map(|i| Person::new(format!("P{}", i), format!("Person {}", i), 1900, "science", 1))
                .collect();
            let group = HonorGroup {
                honor: "Prize".to_string(),
                year: None,
                members: persons.iter().map(|p| p.id.to_string()).collect(),
            };

            let (graph, stats) = GraphBuilder::new().add_cooccurrence(RelationGraph::new(), &persons, &[group]);
            prop_assert_eq!(stats.added, n * n.saturating_sub(1));
            prop_assert_eq!(graph.edge_count(), n * n.saturating_sub(1));
        }
    }
}
