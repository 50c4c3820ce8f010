//! Integration tests for the merge engine and table-level operations.
//! Tests: raw record folding, conflict rules, table compare/merge

use bookmerge_core::{
    AddressTable, AgeValue, AttributeRecord, BookmergeError, Field, FieldRef, MergeRule,
    RawBatch, RawRecord,
};
use serde_json::json;

fn tuple(label: &str, url: &str, age: i64, tag: &str, location: &str, file: &str) -> serde_json::Value {
    json!([label, url, age, null, null, "UTF-8", tag, location, "", file])
}

/// Two exports of the same profile, one older, merged through the JSON batch path.
#[test]
fn batch_of_exports_merges_by_url() {
    let batch = RawBatch::from_json_value(json!({
        "records": [
            tuple("Rust", "http://rust-lang.org", 200, "lang", "Bookmarks Menu::dev", "/x/laptop/bookmarks.html"),
            tuple("Rust Lang", "http://rust-lang.org", 100, "systems", "Bookmarks Menu::dev", "/x/work/bookmarks.html"),
            tuple("Docs", "http://docs.rs", 300, "", "Bookmarks Menu::dev::docs", "/x/work/bookmarks.html"),
        ],
        "failed_files": []
    }))
    .unwrap();

    let mut table = AddressTable::new();
    let stats = table.merge_raw_records(batch.records);
    assert_eq!(stats.records_seen, 3);
    assert_eq!(stats.inserted, 2);
    assert_eq!(stats.merged, 1);

    let rust = table.get("http://rust-lang.org").unwrap();
    assert_eq!(rust.labels(), ["Rust", "Rust Lang"]);
    assert_eq!(rust.get(Field::Age, true), FieldRef::Age(AgeValue::new(100)));
    assert_eq!(rust.tags(), ["lang", "systems"]);
    assert_eq!(rust.locations(), ["Bookmarks Menu::dev"]);
    assert_eq!(
        rust.source_files(),
        ["/x/laptop/bookmarks.html", "/x/work/bookmarks.html"]
    );
    // empty description slot from both exports
    assert_eq!(rust.descriptions(), [""]);
}

#[test]
fn scenario_older_age_wins_and_tags_union() {
    let mut table = AddressTable::new();
    table.merge_raw_records([
        RawRecord::new("x.com").with_label("x").with_age(100).with_tag("a"),
        RawRecord::new("x.com").with_label("x").with_age(50).with_tag("b"),
    ]);
    let record = table.get("x.com").unwrap();
    assert_eq!(record.first_age(), Some(AgeValue::new(50)));
    assert_eq!(record.tags(), ["a", "b"]);
}

#[test]
fn replaying_a_record_is_idempotent() {
    let mut table = AddressTable::new();
    let raw = RawRecord::new("http://a.com")
        .with_label("A")
        .with_age(5)
        .with_tag("t")
        .with_location("l")
        .with_description("d")
        .with_source_file("f");
    table.merge_raw_records([raw.clone()]);
    let once = table.clone();
    table.merge_raw_records([raw]);
    assert_eq!(table, once);
}

#[test]
fn from_record_round_trips_through_merge() {
    let mut record = AttributeRecord::new();
    record.set(Field::Label, "A", true).unwrap();
    record.set(Field::Age, 9, true).unwrap();
    record.set(Field::Location, "folder", true).unwrap();

    let mut table = AddressTable::new();
    table.merge_raw_records([RawRecord::from_record("http://a.com", &record)]);
    assert_eq!(table.get("http://a.com").unwrap(), &record);
}

#[test]
fn duplicate_add_is_an_error_but_replace_is_not() {
    let mut table = AddressTable::new();
    table.add("http://a.com", AttributeRecord::new()).unwrap();
    assert!(matches!(
        table.add("http://a.com", AttributeRecord::new()),
        Err(BookmergeError::DuplicateKey { .. })
    ));
    let mut record = AttributeRecord::new();
    record.set(Field::Label, "new", true).unwrap();
    table.replace("http://a.com", record.clone());
    assert_eq!(table.get("http://a.com"), Some(&record));
}

#[test]
fn merge_tables_rule_zero_is_union() {
    let mut left = AttributeRecord::new();
    left.set(Field::Label, json!(["a"]), true).unwrap();
    left.set(Field::Tags, json!(["t1", "t2"]), true).unwrap();
    let mut right = AttributeRecord::new();
    right.set(Field::Label, json!(["b"]), true).unwrap();
    right.set(Field::Tags, json!(["t2", "t3"]), true).unwrap();

    let mut a = AddressTable::new();
    a.add("http://u", left).unwrap();
    let mut b = AddressTable::new();
    b.add("http://u", right).unwrap();
    b.add("http://only-b", AttributeRecord::new()).unwrap();

    let merged = AddressTable::merge_tables(&a, &b, MergeRule::from_code(0).unwrap());
    let record = merged.get("http://u").unwrap();
    assert_eq!(record.labels(), ["a", "b"]);
    assert_eq!(record.tags(), ["t1", "t2", "t3"]);
    assert!(merged.contains("http://only-b"));

    let diff = AddressTable::compare_tables(&a, &merged);
    assert_eq!(diff.differing, ["http://u"]);
    assert_eq!(diff.only_b, ["http://only-b"]);
    assert!(diff.only_a.is_empty());
}
