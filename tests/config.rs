//! Integration tests for configuration and override files.
//! Tests: legacy YAML keys, rule compilation, override files on disk

use bookmerge_core::{
    AddressTable, BookmergeError, DirectoryLabels, LabelOverrides, MergeConfig, RawRecord,
    ReductionPipeline,
};
use tempfile::TempDir;

const LEGACY_CONFIG: &str = r"
replaceStringsAll:
  - ['Bookmarks Toolbar', 'Toolbar']
dropSetLeading:
  - 'Imported( From Firefox)?'
replaceStringsFirst:
  - ['^Toolbar::', 'Bar::']
emptyContentDropSet:
  - 'None'
  - ~
output_file: bookmarks.json
";

#[test]
fn legacy_yaml_keys_drive_location_rules() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("merge.yaml");
    std::fs::write(&path, LEGACY_CONFIG).unwrap();

    let config = MergeConfig::from_yaml_path(&path).unwrap();
    assert_eq!(config.output_file, "bookmarks.json");
    assert_eq!(config.output_dir("/fallback"), std::path::PathBuf::from("/fallback"));

    let rules = config.compile().unwrap();
    assert_eq!(rules.empty_value_drop_set.len(), 1);

    let mut table = AddressTable::new();
    table.merge_raw_records([
        RawRecord::new("http://a.com").with_location("Bookmarks Toolbar::daily"),
        RawRecord::new("http://b.com").with_location("Imported From Firefox::old"),
        RawRecord::new("http://c.com").with_tag("None"),
    ]);
    ReductionPipeline::new(rules).run(&mut table);

    assert_eq!(table.get("http://a.com").unwrap().locations(), ["Bar::daily"]);
    assert_eq!(table.get("http://b.com").unwrap().locations(), ["old"]);
    assert!(table.get("http://c.com").unwrap().tags().is_empty());
}

#[test]
fn invalid_configs_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "dropSetLeading: [unterminated").unwrap();
    assert!(matches!(
        MergeConfig::from_yaml_path(&path),
        Err(BookmergeError::InvalidConfig { .. })
    ));

    let bad_regex = MergeConfig::from_yaml_str("dropSetLeading: ['(open']").unwrap();
    assert!(matches!(
        bad_regex.compile(),
        Err(BookmergeError::InvalidPattern { .. })
    ));
}

#[test]
fn override_files_round_trip_through_disk() {
    let dir = TempDir::new().unwrap();
    let labels_path = dir.path().join("labels.tab");
    std::fs::write(
        &labels_path,
        "http://a.com\tFirst\nnot a mapping\nhttp://b.com\tOne:::Two\nhttp://a.com\tSecond\n",
    )
    .unwrap();
    let overrides = LabelOverrides::load(&labels_path).unwrap();
    assert_eq!(overrides.len(), 2);
    assert_eq!(overrides.get("http://a.com").unwrap(), ["Second"]);
    assert_eq!(overrides.get("http://b.com").unwrap(), ["One", "Two"]);

    let dirs_path = dir.path().join("dirs.tab");
    std::fs::write(&dirs_path, "Laptop\tlaptop\nOld laptop\tlaptop\n").unwrap();
    let directories = DirectoryLabels::load(&dirs_path).unwrap();
    assert_eq!(directories.get("laptop").unwrap(), ["Laptop", "Old laptop"]);

    let missing = LabelOverrides::load_if_exists(dir.path().join("absent.tab")).unwrap();
    assert!(missing.is_empty());
    assert!(LabelOverrides::load(dir.path().join("absent.tab")).is_err());
}
