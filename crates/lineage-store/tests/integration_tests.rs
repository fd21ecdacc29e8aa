//! Integration tests for lineage-store
//!
//! These tests exercise the full load/save cycle against a temporary
//! directory tree.

use lineage_domain::{Person, PersonId, RelationEdge, RelationGraph};
use lineage_store::{Dataset, DatasetStore, StoreConfig, StoreError};
use std::fs;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> DatasetStore {
    DatasetStore::new(StoreConfig::rooted_at(dir.path()))
}

fn sample_persons() -> Vec<Person> {
    vec![
        Person::new("X2", "Grace", 1906, "science", 90),
        Person::new("X1", "Ada", 1815, "science", 140),
    ]
}

#[test]
fn test_empty_store_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    assert!(store.load_persons().unwrap().is_empty());
    assert!(store.load_graph().unwrap().is_empty());
    assert!(store.load_person_records().unwrap().is_empty());
    assert!(store.load_raw_graph().unwrap().is_empty());
    assert!(store.published_in_sync().unwrap());
}

#[test]
fn test_save_and_load_persons() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.save_persons(&sample_persons()).unwrap();
    let loaded = store.load_persons().unwrap();

    // Published order is descending fame
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id.as_str(), "X1");
    assert_eq!(loaded[1].id.as_str(), "X2");
}

#[test]
fn test_dual_write_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.save_persons(&sample_persons()).unwrap();
    let mut graph = RelationGraph::new();
    graph.push(PersonId::new("X1"), RelationEdge::new("X2", "influenced", 0.8));
    store.save_graph(&graph).unwrap();

    let config = store.config();
    for [working, published] in [config.persons_paths(), config.relations_paths()] {
        assert_eq!(fs::read(working).unwrap(), fs::read(published).unwrap());
    }
    assert!(store.published_in_sync().unwrap());
}

#[test]
fn test_out_of_sync_detected() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save_persons(&sample_persons()).unwrap();

    let [_, published] = store.config().persons_paths();
    fs::write(published, b"[]\n").unwrap();

    assert!(!store.published_in_sync().unwrap());
}

#[test]
fn test_save_dataset_writes_all_artifacts() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let mut graph = RelationGraph::new();
    graph.push(PersonId::new("X1"), RelationEdge::new("X2", "teacher", 1.0));
    let dataset = Dataset {
        persons: sample_persons(),
        graph,
    };
    store.save_dataset(&dataset).unwrap();

    let loaded = store.load_dataset().unwrap();
    assert_eq!(loaded.persons.len(), 2);
    assert_eq!(loaded.graph.edge_count(), 1);
    assert!(store.published_in_sync().unwrap());
}

#[test]
fn test_strict_load_rejects_invalid_record() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let [working, _] = store.config().persons_paths();
    fs::create_dir_all(working.parent().unwrap()).unwrap();
    fs::write(&working, r#"[{"id":"X1","name":"Ada","domains":["science"],"fameScore":1}]"#).unwrap();

    let result = store.load_persons();
    assert!(matches!(result, Err(StoreError::InvalidData { .. })));

    // The lenient view still sees the record
    let records = store.load_person_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].birth_year, None);
}

#[test]
fn test_raw_graph_keeps_malformed_edges() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let [working, _] = store.config().relations_paths();
    fs::create_dir_all(working.parent().unwrap()).unwrap();
    fs::write(&working, r#"{"X1":[{"target":"X2"},{"nature":"teacher","confidence":0.5}]}"#).unwrap();

    let raw = store.load_raw_graph().unwrap();
    assert_eq!(raw["X1"].len(), 2);
    assert!(store.load_graph().is_err());
}

#[test]
fn test_write_report_overwrites() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let path = store.write_report("coverage-report.json", &vec!["first", "run"]).unwrap();
    store.write_report("coverage-report.json", &vec!["second"]).unwrap();

    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("second"));
    assert!(!contents.contains("first"));
}
