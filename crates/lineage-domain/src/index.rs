//! Lookup index over a person set

use crate::person::{Person, PersonId};
use std::collections::HashMap;

/// Outcome of resolving an edge reference against the person set
#[derive(Debug, Clone, PartialEq)]
pub enum TargetResolution<'p> {
    /// The reference is a known identifier
    ById(&'p Person),

    /// The reference is the exact display name of exactly one person
    ByName(&'p Person),

    /// The reference is the display name of several persons
    Ambiguous(Vec<&'p Person>),

    /// Nothing matches
    Unknown,
}

impl<'p> TargetResolution<'p> {
    /// The resolved person, if resolution was unambiguous
    pub fn person(&self) -> Option<&'p Person> {
        match self {
            TargetResolution::ById(person) | TargetResolution::ByName(person) => Some(person),
            _ => None,
        }
    }
}

/// Borrowed index by identifier and by exact display name
pub struct PersonIndex<'p> {
    persons: &'p [Person],
    by_id: HashMap<&'p str, &'p Person>,
    by_name: HashMap<&'p str, Vec<&'p Person>>,
}

impl<'p> PersonIndex<'p> {
    /// Build the index
    ///
    /// If the slice contains the same identifier twice, the first occurrence
    /// is indexed.
    pub fn new(persons: &'p [Person]) -> Self {
        let mut by_id = HashMap::with_capacity(persons.len());
        let mut by_name: HashMap<&str, Vec<&Person>> = HashMap::new();

        for person in persons {
            by_id.entry(person.id.as_str()).or_insert(person);
            by_name.entry(person.name.as_str()).or_default().push(person);
        }

        Self { persons, by_id, by_name }
    }

    /// Look up a person by identifier
    pub fn get(&self, id: &str) -> Option<&'p Person> {
        self.by_id.get(id).copied()
    }

    /// Whether the identifier is present
    pub fn contains(&self, id: &PersonId) -> bool {
        self.by_id.contains_key(id.as_str())
    }

    /// Persons with exactly this display name
    pub fn named(&self, name: &str) -> &[&'p Person] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve an identifier-or-name reference
    ///
    /// Identifiers take precedence; a name is only consulted when no person
    /// carries the reference as identifier.
    pub fn resolve(&self, reference: &str) -> TargetResolution<'p> {
        if let Some(person) = self.get(reference) {
            return TargetResolution::ById(person);
        }

        match self.named(reference) {
            [] => TargetResolution::Unknown,
            [person] => TargetResolution::ByName(*person),
            many => TargetResolution::Ambiguous(many.to_vec()),
        }
    }

    /// The indexed persons
    pub fn persons(&self) -> &'p [Person] {
        self.persons
    }

    /// Number of indexed persons
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persons() -> Vec<Person> {
        vec![
            Person::new("X1", "Ada", 1815, "science", 140),
            Person::new("X2", "Ada", 1900, "art", 90),
            Person::new("X3", "Grace", 1906, "science", 120),
        ]
    }

    #[test]
    fn test_resolve_by_id() {
        let persons = persons();
        let index = PersonIndex::new(&persons);
        assert!(matches!(index.resolve("X3"), TargetResolution::ById(p) if p.name == "Grace"));
    }

    #[test]
    fn test_resolve_by_unique_name() {
        let persons = persons();
        let index = PersonIndex::new(&persons);
        let resolution = index.resolve("Grace");
        assert_eq!(resolution.person().map(|p| p.id.as_str()), Some("X3"));
        assert!(matches!(resolution, TargetResolution::ByName(_)));
    }

    #[test]
    fn test_resolve_ambiguous_name() {
        let persons = persons();
        let index = PersonIndex::new(&persons);
        match index.resolve("Ada") {
            TargetResolution::Ambiguous(matches) => assert_eq!(matches.len(), 2),
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_unknown() {
        let persons = persons();
        let index = PersonIndex::new(&persons);
        assert_eq!(index.resolve("Hypatia"), TargetResolution::Unknown);
        assert!(index.resolve("Hypatia").person().is_none());
    }

    #[test]
    fn test_id_takes_precedence_over_name() {
        let persons = vec![
            Person::new("Grace", "Someone", 1800, "art", 1),
            Person::new("X3", "Grace", 1906, "science", 120),
        ];
        let index = PersonIndex::new(&persons);
        assert!(matches!(index.resolve("Grace"), TargetResolution::ById(p) if p.name == "Someone"));
    }
}
