//! Tests for the file-backed alias store.

use std::fs;

use relaysig_map::{AliasStore, StoreError};
use relaysig_model::{AliasEntry, SignalKind};

fn entry(model: &str, name: &str, standard: &str, kind: SignalKind) -> AliasEntry {
    AliasEntry::new(model, name, standard, kind)
}

#[test]
fn missing_file_opens_empty_and_is_created_on_write() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("data").join("alias_database.json");

    let mut store = AliasStore::open(&path).expect("open");
    assert!(store.is_empty());
    assert!(!path.exists());

    store
        .add(entry("REL670", "IL1", "IA", SignalKind::Analog))
        .expect("add");
    assert!(path.exists());

    let reopened = AliasStore::open(&path).expect("reopen");
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get("REL670", "IL1").unwrap().standard_name, "IA");
}

#[test]
fn backing_file_uses_model_name_keys() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("aliases.json");
    let mut store = AliasStore::open(&path).expect("open");
    store
        .add(entry("REL670", "TRIP_L1", "TRIP_A", SignalKind::Binary))
        .expect("add");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
    let record = &json["REL670::TRIP_L1"];
    assert_eq!(record["standard_name"], "TRIP_A");
    assert_eq!(record["signal_type"], "binary");
    assert_eq!(record["auto_detected"], false);
}

#[test]
fn corrupt_file_opens_empty_and_is_replaced() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("aliases.json");
    fs::write(&path, "{ not json").expect("write");

    let mut store = AliasStore::open(&path).expect("open");
    assert!(store.is_empty());

    store
        .add(entry("REL670", "IL1", "IA", SignalKind::Analog))
        .expect("add");
    assert_eq!(AliasStore::open(&path).expect("reopen").len(), 1);
}

#[test]
fn entries_without_identity_make_the_file_corrupt() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("aliases.json");
    fs::write(
        &path,
        r#"{"REL670::IL1": {"relay_name": "IL1", "relay_model": "REL670", "standard_name": "IA"}, "x": {}}"#,
    )
    .expect("write");

    let store = AliasStore::open(&path).expect("open");
    assert!(store.is_empty());
    assert!(store.get("", "").is_none());
}

#[test]
fn add_is_idempotent() {
    let mut store = AliasStore::in_memory();
    let alias = entry("REL670", "IL1", "IA", SignalKind::Analog);
    assert!(store.add(alias.clone()).expect("first"));
    assert!(!store.add(alias.clone()).expect("second"));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("REL670", "IL1"), Some(&alias));
}

#[test]
fn remove_and_clear() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("aliases.json");
    let mut store = AliasStore::open(&path).expect("open");
    store
        .add(entry("REL670", "IL1", "IA", SignalKind::Analog))
        .expect("add");
    store
        .add(entry("REL670", "IL2", "IB", SignalKind::Analog))
        .expect("add");

    assert!(store.remove("REL670", "IL1").expect("remove"));
    assert!(!store.remove("REL670", "IL1").expect("remove again"));
    assert_eq!(AliasStore::open(&path).expect("reopen").len(), 1);

    store.clear().expect("clear");
    assert!(AliasStore::open(&path).expect("reopen").is_empty());
}

#[test]
fn lookups_by_name_standard_model_and_function() {
    let mut store = AliasStore::in_memory();
    let mut trip = entry("RED670", "TRIP_L1", "TRIP_A", SignalKind::Binary);
    trip.function = "differential".to_string();
    store.add(trip).expect("add");
    store
        .add(entry("REL670", "TRIP_L1", "TRIP_A", SignalKind::Binary))
        .expect("add");
    store
        .add(entry("REL670", "IL1", "IA", SignalKind::Analog))
        .expect("add");

    assert_eq!(store.find_by_name("trip_l1").len(), 2);
    assert_eq!(store.find_by_standard_name("ia").len(), 1);
    assert_eq!(store.by_model("rel670").len(), 2);
    assert_eq!(store.by_function("Differential").len(), 1);
    assert_eq!(store.functions(), vec!["differential"]);
    assert_eq!(store.models(), vec!["RED670", "REL670"]);
    assert_eq!(store.all().count(), 3);
}

#[test]
fn export_import_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let export = dir.path().join("export.json");

    let mut source = AliasStore::in_memory();
    source
        .add(entry("REL670", "IL1", "IA", SignalKind::Analog))
        .expect("add");
    source
        .add(entry("REL670", "TRIP_L1", "TRIP_A", SignalKind::Binary))
        .expect("add");
    source.export_to(&export).expect("export");

    let mut target = AliasStore::in_memory();
    assert_eq!(target.import_from(&export).expect("import"), 2);
    assert_eq!(target.import_from(&export).expect("import again"), 0);
    assert_eq!(
        target.all().cloned().collect::<Vec<_>>(),
        source.all().cloned().collect::<Vec<_>>()
    );
}

#[test]
fn import_rejects_malformed_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bad.json");
    fs::write(&path, "[1, 2, 3]").expect("write");

    let mut store = AliasStore::in_memory();
    let err = store.import_from(&path).expect_err("malformed");
    assert!(matches!(err, StoreError::Json { .. }));
    assert!(store.is_empty());

    let err = store
        .import_from(&dir.path().join("missing.json"))
        .expect_err("missing");
    assert!(matches!(err, StoreError::Io { .. }));
}
