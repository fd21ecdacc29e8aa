//! Core Janitor implementation for dataset cleanup

use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use lineage_curator::{Contender, OverrideTable, WinnerPolicy};
use lineage_domain::{Person, PersonId, PersonIndex, TargetResolution};
use lineage_store::Dataset;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// Janitor service for explicit dataset cleanup
///
/// Responsible for:
/// - Resolving normalized-name duplicates left behind by merges
/// - Rewriting legacy name targets to identifiers
/// - Removing edges that point nowhere
///
/// Each pass is a pure transformation of an in-memory [`Dataset`]; the
/// caller persists the result.
///
/// # Examples
///
/// ```
/// use lineage_janitor::{Janitor, JanitorConfig};
/// use lineage_store::Dataset;
///
/// let mut dataset = Dataset::default();
/// let mut janitor = Janitor::new(JanitorConfig::default());
///
/// let metrics = janitor.sweep(&mut dataset).unwrap();
/// println!("{}", metrics.summary());
/// ```
pub struct Janitor {
    config: JanitorConfig,
    policy: Box<dyn WinnerPolicy>,
    metrics: JanitorMetrics,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    ///
    /// Duplicates are resolved by fame score until a policy is supplied.
    pub fn new(config: JanitorConfig) -> Self {
        Self {
            config,
            policy: Box::new(OverrideTable::new()),
            metrics: JanitorMetrics::new(),
        }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Decide duplicates with a custom policy
    pub fn with_policy(mut self, policy: impl WinnerPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Perform a complete sweep over the dataset
    ///
    /// Runs, in order and as configured:
    /// 1. Dedup resolution
    /// 2. Name-target migration
    /// 3. Orphan-edge removal
    ///
    /// In dry-run mode the dataset is left untouched and the metrics
    /// describe what would have changed.
    pub fn sweep(&mut self, dataset: &mut Dataset) -> Result<JanitorMetrics, JanitorError> {
        self.config.validate()?;

        let mut working = dataset.clone();

        if self.config.resolve_duplicates {
            self.resolve_duplicates(&mut working);
        }
        if self.config.migrate_name_targets {
            self.migrate_name_targets(&mut working);
        }
        if self.config.remove_orphans {
            self.remove_orphans(&mut working);
        }

        if self.config.dry_run {
            info!("DRY RUN: {} change(s) not applied", self.metrics.total_changes());
        } else {
            *dataset = working;
        }

        self.metrics.record_sweep(self.config.dry_run);
        Ok(self.metrics.clone())
    }

    /// Keep one person per normalized name, chosen by the policy
    fn resolve_duplicates(&mut self, dataset: &mut Dataset) {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<&Person>> = HashMap::new();

        for person in &dataset.persons {
            let key = person.normalized_name();
            let group = groups.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                Vec::new()
            });
            if !group.iter().any(|p| p.id == person.id) {
                group.push(person);
            }
        }

        let mut losers: HashSet<PersonId> = HashSet::new();
        for key in &order {
            let group = &groups[key];
            if group.len() < 2 {
                continue;
            }

            let contenders: Vec<Contender> = group
                .iter()
                .map(|p| Contender::new(p.id.clone(), p.fame_score))
                .collect();
            let (winner, reason) = self.policy.choose(key, &contenders);
            let winner = &contenders[winner].id;

            for contender in contenders.iter().filter(|c| &c.id != winner) {
                if self.config.dry_run {
                    info!("DRY RUN: Would remove {} ('{}'), keeping {} ({:?})", contender.id, key, winner, reason);
                } else {
                    info!("Removing {} ('{}'), keeping {} ({:?})", contender.id, key, winner, reason);
                }
                losers.insert(contender.id.clone());
                self.metrics.record_person_removal(contender.id.clone());
            }
        }

        if losers.is_empty() {
            return;
        }
        dataset.persons.retain(|p| !losers.contains(&p.id));

        // References to removed persons go with them, whether or not the
        // orphan pass runs
        for loser in &losers {
            if let Some(edges) = dataset.graph.remove_source(loser) {
                debug!("Removing {} edge(s) from deduplicated {}", edges.len(), loser);
                self.metrics.record_edge_list_removal(edges.len());
            }
        }
        for (source, edges) in dataset.graph.iter_mut() {
            let before = edges.len();
            edges.retain(|edge| !losers.contains(&PersonId::new(edge.target.as_str())));
            let removed = before - edges.len();
            if removed > 0 {
                debug!("Removing {} edge(s) from {} to deduplicated persons", removed, source);
                self.metrics.record_edge_removal(removed);
            }
        }
        dataset.graph.prune_empty();
    }

    /// Rewrite name targets that resolve to exactly one person
    fn migrate_name_targets(&mut self, dataset: &mut Dataset) {
        let Dataset { persons, graph } = dataset;
        let index = PersonIndex::new(persons.as_slice());

        for (source, edges) in graph.iter_mut() {
            let mut migrated = false;
            for edge in edges.iter_mut() {
                match index.resolve(&edge.target) {
                    TargetResolution::ByName(person) => {
                        debug!(source = %source, from = %edge.target, to = %person.id, "Migrating name target");
                        edge.target = person.id.to_string();
                        self.metrics.record_migration();
                        migrated = true;
                    }
                    TargetResolution::Ambiguous(matches) => {
                        debug!(source = %source, target = %edge.target, matches = matches.len(), "Leaving ambiguous target");
                        self.metrics.record_ambiguous();
                    }
                    TargetResolution::ById(_) | TargetResolution::Unknown => {}
                }
            }

            if migrated {
                // Migration can turn a legacy edge into a copy of a newer one
                let mut seen = BTreeSet::new();
                let before = edges.len();
                edges.retain(|edge| seen.insert((edge.target.clone(), edge.nature.clone())));
                self.metrics.record_edge_removal(before - edges.len());
            }
        }

        if self.metrics.edges_migrated > 0 {
            info!(
                migrated = self.metrics.edges_migrated,
                ambiguous = self.metrics.ambiguous_edges_left,
                "Name targets migrated"
            );
        }
    }

    /// Drop edge lists whose source is gone and edges whose target is unknown
    fn remove_orphans(&mut self, dataset: &mut Dataset) {
        let Dataset { persons, graph } = dataset;
        let index = PersonIndex::new(persons.as_slice());

        let orphaned: Vec<PersonId> = graph
            .iter()
            .filter(|(source, _)| !index.contains(source))
            .map(|(source, _)| source.clone())
            .collect();
        for source in orphaned {
            if let Some(edges) = graph.remove_source(&source) {
                info!("Removing {} edge(s) from missing source {}", edges.len(), source);
                self.metrics.record_edge_list_removal(edges.len());
            }
        }

        for (source, edges) in graph.iter_mut() {
            let before = edges.len();
            edges.retain(|edge| !matches!(index.resolve(&edge.target), TargetResolution::Unknown));
            let removed = before - edges.len();
            if removed > 0 {
                info!("Removing {} edge(s) with unknown targets from {}", removed, source);
                self.metrics.record_edge_removal(removed);
            }
        }
        graph.prune_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_domain::{RelationEdge, RelationGraph};

    fn dataset() -> Dataset {
        let persons = vec![
            Person::new("Q1", "John Smith", 1900, "science", 50),
            Person::new("Q2", "john  smith", 1910, "art", 80),
            Person::new("Q3", "Ada", 1815, "science", 140),
            Person::new("Q4", "Grace", 1906, "science", 90),
            Person::new("Q5", "Grace", 1950, "music", 5),
        ];

        let mut graph = RelationGraph::new();
        graph.push(PersonId::new("Q3"), RelationEdge::new("Q1", "influenced", 0.5));
        graph.push(PersonId::new("Q3"), RelationEdge::new("Grace", "contemporary", 0.5));
        graph.push(PersonId::new("Q3"), RelationEdge::new("Nobody", "teacher", 1.0));
        graph.push(PersonId::new("Q9"), RelationEdge::new("Q3", "student", 1.0));
        graph.push(PersonId::new("Q4"), RelationEdge::new("Q3", "influenced", 0.7));
        graph.push(PersonId::new("Q4"), RelationEdge::new("Ada", "influenced", 0.7));
        graph.push(PersonId::new("Q4"), RelationEdge::new("Ada", "student", 0.6));

        Dataset { persons, graph }
    }

    #[test]
    fn test_default_sweep_migrates_and_removes_orphans() {
        let mut data = dataset();
        let metrics = Janitor::default_config().sweep(&mut data).unwrap();

        // No dedup by default
        assert_eq!(data.persons.len(), 5);
        assert_eq!(metrics.persons_removed, 0);

        // Both "Ada" targets → Q3; "Grace" is ambiguous
        assert_eq!(metrics.edges_migrated, 2);
        assert_eq!(metrics.ambiguous_edges_left, 1);

        // Q9 list, the "Nobody" edge, and Q4's migrated copy of an existing edge
        assert_eq!(metrics.edge_lists_removed, 1);
        assert_eq!(metrics.edges_removed, 3);

        assert!(data.graph.edges(&PersonId::new("Q9")).is_empty());
        assert_eq!(data.graph.edges(&PersonId::new("Q4")).len(), 2);
        assert!(data.graph.edges(&PersonId::new("Q3")).iter().all(|e| e.target != "Nobody"));
    }

    #[test]
    fn test_dedup_by_fame() {
        let mut data = dataset();
        let mut janitor = Janitor::new(JanitorConfig::aggressive());
        let metrics = janitor.sweep(&mut data).unwrap();

        assert_eq!(metrics.removed_ids, vec![PersonId::new("Q1"), PersonId::new("Q5")]);
        assert_eq!(data.persons.len(), 3);

        // Edges to the removed Q1 go with it; "Grace" is now unique and migrates
        let targets: Vec<&str> = data.graph.edges(&PersonId::new("Q3")).iter().map(|e| e.target.as_str()).collect();
        assert!(!targets.contains(&"Q1"));
        assert!(targets.contains(&"Q4"));
        assert_eq!(metrics.ambiguous_edges_left, 0);
    }

    #[test]
    fn test_dedup_without_orphan_pass_leaves_no_dangling_edges() {
        let persons = vec![
            Person::new("Q1", "John Smith", 1900, "science", 10),
            Person::new("Q2", "John Smith", 1910, "art", 80),
            Person::new("Q3", "Ada", 1815, "science", 140),
        ];
        let mut graph = RelationGraph::new();
        graph.push(PersonId::new("Q3"), RelationEdge::new("Q1", "influenced", 0.5));
        graph.push(PersonId::new("Q3"), RelationEdge::new("Q2", "teacher", 0.9));
        graph.push(PersonId::new("Q1"), RelationEdge::new("Q3", "student", 1.0));
        let mut data = Dataset { persons, graph };

        let config = JanitorConfig {
            dry_run: false,
            resolve_duplicates: true,
            remove_orphans: false,
            migrate_name_targets: false,
        };
        let metrics = Janitor::new(config).sweep(&mut data).unwrap();

        let ids: Vec<&str> = data.persons.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["Q2", "Q3"]);
        assert!(data.graph.edges(&PersonId::new("Q1")).is_empty());
        for (source, edges) in data.graph.iter() {
            assert!(ids.contains(&source.as_str()));
            assert!(edges.iter().all(|e| ids.contains(&e.target.as_str())));
        }
        assert_eq!(data.graph.edges(&PersonId::new("Q3")).len(), 1);
        assert_eq!(metrics.edge_lists_removed, 1);
        assert_eq!(metrics.edges_removed, 2);
    }

    #[test]
    fn test_dedup_with_override() {
        let mut data = dataset();
        let table = OverrideTable::from_entries([("John Smith", "Q1")]).unwrap();
        let mut janitor = Janitor::new(JanitorConfig::aggressive()).with_policy(table);
        let metrics = janitor.sweep(&mut data).unwrap();

        assert!(metrics.removed_ids.contains(&PersonId::new("Q2")));
        assert!(data.persons.iter().any(|p| p.id.as_str() == "Q1"));
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let mut data = dataset();
        let original = data.clone();
        let mut janitor = Janitor::new(JanitorConfig::lenient());
        let metrics = janitor.sweep(&mut data).unwrap();

        assert_eq!(data, original);
        assert!(metrics.dry_run);
        assert_eq!(metrics.persons_removed, 2);
        assert!(metrics.total_changes() > 0);
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let mut data = dataset();
        Janitor::new(JanitorConfig::aggressive()).sweep(&mut data).unwrap();
        let after_first = data.clone();

        let metrics = Janitor::new(JanitorConfig::aggressive()).sweep(&mut data).unwrap();
        assert_eq!(metrics.total_changes(), 0);
        assert_eq!(data, after_first);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = JanitorConfig {
            dry_run: false,
            resolve_duplicates: false,
            remove_orphans: false,
            migrate_name_targets: false,
        };
        let mut data = dataset();
        assert!(Janitor::new(config).sweep(&mut data).is_err());
    }

    #[test]
    fn test_metrics_accumulate_until_reset() {
        let mut janitor = Janitor::default_config();
        let mut data = Dataset::default();
        janitor.sweep(&mut data).unwrap();
        janitor.sweep(&mut data).unwrap();
        assert_eq!(janitor.metrics().sweep_count, 2);

        janitor.reset_metrics();
        assert_eq!(janitor.metrics().sweep_count, 0);
    }
}
