//! Integration tests for table persistence.
//! Tests: JSON round trips, legacy snapshot shapes, atomic rewrite, snapshot discovery

use bookmerge_core::{
    AddressTable, AgeValue, BookmergeError, Field, RawRecord, WriteOptions, newest_snapshot,
    output_names,
};
use serde_json::{Value, json};
use tempfile::TempDir;

fn populated() -> AddressTable {
    let mut table = AddressTable::new();
    table.merge_raw_records([
        RawRecord::new("http://a.com")
            .with_label("A")
            .with_age(100)
            .with_tag("t")
            .with_location("news")
            .with_description("about a")
            .with_source_file("laptop:::firefox"),
        RawRecord::new("http://b.com").with_label("B"),
    ]);
    let mut two_ages = table.get("http://b.com").unwrap().clone();
    two_ages.set(Field::Age, json!([7, 3]), true).unwrap();
    table.replace("http://b.com", two_ages);
    table
}

#[test]
fn write_read_round_trip_is_lossless() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("addr.json");
    let table = populated();
    table.write_json(&path, WriteOptions::compact()).unwrap();

    let reread = AddressTable::read_json(&path).unwrap();
    assert_eq!(reread, table);
    assert_eq!(
        reread.get("http://b.com").unwrap().ages(),
        [AgeValue::new(7), AgeValue::new(3)]
    );
}

#[test]
fn persisted_shape_collapses_only_single_age() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("addr.json");
    populated().write_json(&path, WriteOptions::compact()).unwrap();

    let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["http://a.com"][1], json!("100"));
    assert_eq!(value["http://a.com"][0], json!(["A"]));
    assert_eq!(value["http://b.com"][1], json!(["7", "3"]));
    assert_eq!(value["http://b.com"][2], json!([]));
}

#[test]
fn legacy_snapshots_with_numeric_ages_load() {
    let table = AddressTable::from_json_value(&json!({
        "http://old.com": [["Old"], 1234, ["t"], ["loc"], [], ["f"]],
        "http://list.com": [["List"], [55], [], [], [], []]
    }))
    .unwrap();
    assert_eq!(
        table.get("http://old.com").unwrap().first_age(),
        Some(AgeValue::new(1234))
    );
    assert_eq!(
        table.get("http://list.com").unwrap().first_age(),
        Some(AgeValue::new(55))
    );
}

#[test]
fn bad_age_in_snapshot_fails() {
    let err = AddressTable::from_json_value(&json!({
        "http://bad.com": [[], "not a time", [], [], [], []]
    }))
    .unwrap_err();
    assert!(matches!(err, BookmergeError::InvalidAge { .. }));
}

#[test]
fn rewrite_replaces_previous_contents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("addr.json");
    populated().write_json(&path, WriteOptions::pretty(4)).unwrap();

    let mut smaller = AddressTable::new();
    smaller.merge_raw_records([RawRecord::new("http://c.com")]);
    smaller.write_json(&path, WriteOptions::compact()).unwrap();

    let reread = AddressTable::read_json(&path).unwrap();
    assert_eq!(reread.len(), 1);
    assert!(reread.contains("http://c.com"));
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn newest_snapshot_finds_latest_reduced_table() {
    let dir = TempDir::new().unwrap();
    let names = output_names("addr.json", None);
    populated()
        .write_json(dir.path().join(&names.reduced), WriteOptions::compact())
        .unwrap();
    populated()
        .write_json(dir.path().join(&names.original), WriteOptions::compact())
        .unwrap();

    let found = newest_snapshot(dir.path(), "addr.json").unwrap().unwrap();
    assert_eq!(found.file_name().unwrap(), "addr.json");
    assert_eq!(AddressTable::read_json(found).unwrap(), populated());
}
