//! Metrics collection for Janitor operations

use lineage_domain::PersonId;
use serde::Serialize;

/// Metrics collected during Janitor operations
///
/// In dry-run mode the counters describe what would have changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JanitorMetrics {
    /// Persons removed by dedup resolution
    pub persons_removed: usize,

    /// Identifiers removed by dedup resolution
    pub removed_ids: Vec<PersonId>,

    /// Edge lists removed because their source no longer exists
    pub edge_lists_removed: usize,

    /// Edges removed (orphaned lists, unknown targets, duplicates)
    pub edges_removed: usize,

    /// Name targets rewritten to identifiers
    pub edges_migrated: usize,

    /// Name targets left alone because several persons share the name
    pub ambiguous_edges_left: usize,

    /// Total sweep iterations completed
    pub sweep_count: usize,

    /// Whether the last sweep was a dry run
    pub dry_run: bool,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a person removed by dedup resolution
    pub fn record_person_removal(&mut self, id: PersonId) {
        self.persons_removed += 1;
        self.removed_ids.push(id);
    }

    /// Record an orphaned edge list and the edges it held
    pub fn record_edge_list_removal(&mut self, edges: usize) {
        self.edge_lists_removed += 1;
        self.edges_removed += edges;
    }

    /// Record individual edge removals
    pub fn record_edge_removal(&mut self, count: usize) {
        self.edges_removed += count;
    }

    /// Record a migrated name target
    pub fn record_migration(&mut self) {
        self.edges_migrated += 1;
    }

    /// Record a name target left ambiguous
    pub fn record_ambiguous(&mut self) {
        self.ambiguous_edges_left += 1;
    }

    /// Record a sweep cycle completion
    pub fn record_sweep(&mut self, dry_run: bool) {
        self.sweep_count += 1;
        self.dry_run = dry_run;
    }

    /// Total changes across all passes
    pub fn total_changes(&self) -> usize {
        self.persons_removed + self.edge_lists_removed + self.edges_removed + self.edges_migrated
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
        ];
        if self.dry_run {
            lines.push("Mode: dry run (nothing was changed)".to_string());
        }
        lines.push(String::new());

        lines.push(format!("Persons removed: {}", self.persons_removed));
        if !self.removed_ids.is_empty() {
            let ids: Vec<&str> = self.removed_ids.iter().map(PersonId::as_str).collect();
            lines.push(format!("  {}", ids.join(", ")));
        }
        lines.push(format!("Edge lists removed: {}", self.edge_lists_removed));
        lines.push(format!("Edges removed: {}", self.edges_removed));
        lines.push(format!("Edges migrated: {}", self.edges_migrated));
        lines.push(format!("Ambiguous edges left: {}", self.ambiguous_edges_left));

        lines.join("\n")
    }
}
