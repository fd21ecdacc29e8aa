//! Person set and relation graph persistence

use crate::atomic::write_atomic;
use crate::config::StoreConfig;
use crate::{Result, StoreError};
use lineage_domain::{Person, PersonRecord, RawGraph, RelationGraph};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sort persons for publication: descending fame, ties by identifier
pub fn sort_for_publication(persons: &mut [Person]) {
    persons.sort_by(|a, b| b.fame_score.cmp(&a.fame_score).then_with(|| a.id.cmp(&b.id)));
}

/// Read and deserialize a JSON document
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| StoreError::InvalidData {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`read_json`], but a missing file yields the default value
fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    match fs::metadata(path) {
        Ok(_) => read_json(path),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist yet, starting empty", path.display());
            Ok(T::default())
        }
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn to_document<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// A loaded person set with its relation graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Canonical person set
    pub persons: Vec<Person>,
    /// Relation graph
    pub graph: RelationGraph,
}

/// File-backed store for the curated dataset
///
/// Reads always come from the working copy; writes always replace both
/// the working and the published copy with identical bytes.
pub struct DatasetStore {
    config: StoreConfig,
}

impl DatasetStore {
    /// Create a store over the configured locations
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// The configured locations
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Load the canonical person set (empty when nothing was persisted yet)
    ///
    /// Fails with [`StoreError::InvalidData`] if any record violates the
    /// structural invariants; use [`load_person_records`](Self::load_person_records)
    /// to inspect such data.
    pub fn load_persons(&self) -> Result<Vec<Person>> {
        let [working, _] = self.config.persons_paths();
        let persons: Vec<Person> = read_json_or_default(&working)?;
        debug!("Loaded {} persons from {}", persons.len(), working.display());
        Ok(persons)
    }

    /// Load the person set without enforcing any invariant
    pub fn load_person_records(&self) -> Result<Vec<PersonRecord>> {
        let [working, _] = self.config.persons_paths();
        read_json_or_default(&working)
    }

    /// Load the relation graph (empty when nothing was persisted yet)
    pub fn load_graph(&self) -> Result<RelationGraph> {
        let [working, _] = self.config.relations_paths();
        let graph: RelationGraph = read_json_or_default(&working)?;
        debug!("Loaded {} edges from {}", graph.edge_count(), working.display());
        Ok(graph)
    }

    /// Load the relation graph without enforcing any invariant
    pub fn load_raw_graph(&self) -> Result<RawGraph> {
        let [working, _] = self.config.relations_paths();
        read_json_or_default(&working)
    }

    /// Load both artifacts
    pub fn load_dataset(&self) -> Result<Dataset> {
        Ok(Dataset {
            persons: self.load_persons()?,
            graph: self.load_graph()?,
        })
    }

    /// Persist the person set to both locations
    pub fn save_persons(&self, persons: &[Person]) -> Result<()> {
        let bytes = Self::persons_document(persons)?;
        let [working, published] = self.config.persons_paths();
        write_atomic(&[(working.as_path(), bytes.as_slice()), (published.as_path(), bytes.as_slice())])?;
        info!("Wrote {} persons to {} and {}", persons.len(), working.display(), published.display());
        Ok(())
    }

    /// Persist the relation graph to both locations
    pub fn save_graph(&self, graph: &RelationGraph) -> Result<()> {
        let bytes = to_document(graph)?;
        let [working, published] = self.config.relations_paths();
        write_atomic(&[(working.as_path(), bytes.as_slice()), (published.as_path(), bytes.as_slice())])?;
        info!("Wrote {} edges to {} and {}", graph.edge_count(), working.display(), published.display());
        Ok(())
    }

    /// Persist both artifacts in one staged batch
    ///
    /// Used by cleanup passes that change persons and edges together: either
    /// all four files are replaced or none is.
    pub fn save_dataset(&self, dataset: &Dataset) -> Result<()> {
        let persons = Self::persons_document(&dataset.persons)?;
        let graph = to_document(&dataset.graph)?;
        let [p_work, p_pub] = self.config.persons_paths();
        let [r_work, r_pub] = self.config.relations_paths();

        write_atomic(&[
            (p_work.as_path(), persons.as_slice()),
            (p_pub.as_path(), persons.as_slice()),
            (r_work.as_path(), graph.as_slice()),
            (r_pub.as_path(), graph.as_slice()),
        ])?;
        info!(
            "Wrote {} persons and {} edges",
            dataset.persons.len(),
            dataset.graph.edge_count()
        );
        Ok(())
    }

    /// Write a report document, replacing any previous one
    pub fn write_report<T: Serialize>(&self, file_name: &str, report: &T) -> Result<PathBuf> {
        let path = self.config.report_dir.join(file_name);
        let bytes = to_document(report)?;
        write_atomic(&[(path.as_path(), bytes.as_slice())])?;
        info!("Wrote report {}", path.display());
        Ok(path)
    }

    /// Whether the published copies are byte-identical to the working copies
    ///
    /// Missing files on both sides count as identical.
    pub fn published_in_sync(&self) -> Result<bool> {
        for [working, published] in [self.config.persons_paths(), self.config.relations_paths()] {
            if read_optional_bytes(&working)? != read_optional_bytes(&published)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn persons_document(persons: &[Person]) -> Result<Vec<u8>> {
        let mut sorted = persons.to_vec();
        sort_for_publication(&mut sorted);
        to_document(&sorted)
    }
}

fn read_optional_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_for_publication() {
        let mut persons = vec![
            Person::new("B", "Bee", 1900, "art", 10),
            Person::new("C", "Cee", 1900, "art", 50),
            Person::new("A", "Ay", 1900, "art", 10),
        ];
        sort_for_publication(&mut persons);
        let ids: Vec<_> = persons.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_document_ends_with_newline() {
        let bytes = to_document(&vec![1, 2]).unwrap();
        assert_eq!(bytes.last(), Some(&b'\n'));
    }
}
