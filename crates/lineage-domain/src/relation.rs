//! Relation module - directed, typed, weighted edges between persons

use crate::index::{PersonIndex, TargetResolution};
use crate::person::PersonId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An outgoing edge stored under its source person
///
/// `target` holds the target's identifier. Graphs written by older
/// producers may still hold a display name here; see
/// [`RelationGraph::display_target`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEdge {
    /// Target identifier (or legacy display name)
    pub target: String,

    /// Relationship tag
    pub nature: String,

    /// Confidence in (0, 1]
    pub confidence: f64,
}

impl RelationEdge {
    /// Create a new edge
    pub fn new(target: impl Into<String>, nature: impl Into<String>, confidence: f64) -> Self {
        Self {
            target: target.into(),
            nature: nature.into(),
            confidence,
        }
    }
}

/// Outgoing edges per source identifier
///
/// Edge order within a source is curation order. The graph is not required
/// to be symmetric: A→B says nothing about B→A.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationGraph {
    edges: BTreeMap<PersonId, Vec<RelationEdge>>,
}

impl RelationGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Outgoing edges of `source` (empty if none)
    pub fn edges(&self, source: &PersonId) -> &[RelationEdge] {
        self.edges.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append an edge, creating the source's list if absent
    pub fn push(&mut self, source: PersonId, edge: RelationEdge) {
        self.edges.entry(source).or_default().push(edge);
    }

    /// Iterate sources and their edges in key order
    pub fn iter(&self) -> impl Iterator<Item = (&PersonId, &Vec<RelationEdge>)> {
        self.edges.iter()
    }

    /// Mutable access to every edge list
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&PersonId, &mut Vec<RelationEdge>)> {
        self.edges.iter_mut()
    }

    /// Remove a source with all of its edges
    pub fn remove_source(&mut self, source: &PersonId) -> Option<Vec<RelationEdge>> {
        self.edges.remove(source)
    }

    /// Drop sources whose edge list became empty
    pub fn prune_empty(&mut self) {
        self.edges.retain(|_, edges| !edges.is_empty());
    }

    /// Number of sources with at least one stored list
    pub fn source_count(&self) -> usize {
        self.edges.len()
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Whether the graph holds no edges
    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    /// Display name for an edge target
    ///
    /// Identifiers are resolved through the index; a legacy name-only target
    /// is returned as stored. The name is a derived display value and never
    /// a lookup key for new edges.
    pub fn display_target<'a>(index: &'a PersonIndex<'_>, target: &'a str) -> &'a str {
        match index.resolve(target) {
            TargetResolution::ById(person) => &person.name,
            _ => target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::Person;

    #[test]
    fn test_push_and_count() {
        let mut graph = RelationGraph::new();
        let source = PersonId::new("X1");
        graph.push(source.clone(), RelationEdge::new("X2", "teacher", 0.9));
        graph.push(source.clone(), RelationEdge::new("X3", "influenced", 0.5));

        assert_eq!(graph.edges(&source).len(), 2);
        assert_eq!(graph.edges(&source)[0].target, "X2");
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.source_count(), 1);
        assert!(graph.edges(&PersonId::new("X9")).is_empty());
    }

    #[test]
    fn test_prune_empty() {
        let mut graph = RelationGraph::new();
        graph.push(PersonId::new("X1"), RelationEdge::new("X2", "teacher", 1.0));
        for (_, edges) in graph.iter_mut() {
            edges.clear();
        }
        graph.prune_empty();
        assert_eq!(graph.source_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut graph = RelationGraph::new();
        graph.push(PersonId::new("X1"), RelationEdge::new("X2", "teacher", 1.0));

        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["X1"][0]["target"], "X2");
        assert_eq!(json["X1"][0]["nature"], "teacher");

        let back: RelationGraph = serde_json::from_value(json).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn test_display_target() {
        let persons = vec![Person::new("X2", "Grace", 1906, "science", 90)];
        let index = PersonIndex::new(&persons);

        assert_eq!(RelationGraph::display_target(&index, "X2"), "Grace");
        assert_eq!(RelationGraph::display_target(&index, "Grace"), "Grace");
        assert_eq!(RelationGraph::display_target(&index, "Nobody"), "Nobody");
    }
}
