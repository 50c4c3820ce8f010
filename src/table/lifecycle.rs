//! Construction and persistence for [`AddressTable`].
//!
//! The persisted form is a JSON object keyed by URL whose values are six-position
//! attribute arrays (see [`AttributeRecord::to_serializable`]). Writes go through an
//! atomic temp-file-and-rename so a crashed run never leaves a truncated table behind.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{BookmergeError, Result};
use crate::types::AttributeRecord;

/// Output formatting for [`AddressTable::write_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Indent width for pretty output; `None` writes compact JSON.
    pub indent: Option<usize>,
}

impl WriteOptions {
    #[must_use]
    pub fn compact() -> Self {
        Self { indent: None }
    }

    #[must_use]
    pub fn pretty(indent: usize) -> Self {
        Self {
            indent: Some(indent),
        }
    }
}

/// URL-keyed table of bookmark attribute records.
///
/// Keys are unique; [`AddressTable::add`] refuses an existing URL and
/// [`AddressTable::replace`] overwrites. Iteration order is the URL sort order so
/// serialized output and reports are stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressTable {
    pub(crate) entries: BTreeMap<String, AttributeRecord>,
}

impl AddressTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    #[must_use]
    pub fn get(&self, url: &str) -> Option<&AttributeRecord> {
        self.entries.get(url)
    }

    pub fn get_mut(&mut self, url: &str) -> Option<&mut AttributeRecord> {
        self.entries.get_mut(url)
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeRecord)> {
        self.entries.iter().map(|(url, record)| (url.as_str(), record))
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = (&String, &mut AttributeRecord)> {
        self.entries.iter_mut()
    }

    // -- JSON ----------------------------------------------------------------------------

    /// Build a table from the persisted JSON shape.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let mut table = Self::new();
        table.extend_from_json_value(value)?;
        Ok(table)
    }

    /// Add every entry of a persisted table. Entries go through [`Self::add`], so a URL
    /// already in `self` is a [`BookmergeError::DuplicateKey`]. Entries that are not
    /// attribute arrays are skipped with a warning.
    pub fn extend_from_json_value(&mut self, value: &Value) -> Result<usize> {
        let Value::Object(entries) = value else {
            return Err(BookmergeError::InvalidSnapshot {
                reason: "expected a JSON object keyed by url".to_string(),
            });
        };
        let mut added = 0;
        for (url, attributes) in entries {
            if !attributes.is_array() {
                tracing::warn!(
                    target = "bookmerge::store",
                    url = %url,
                    "skipping snapshot entry that is not an attribute list"
                );
                continue;
            }
            let record = AttributeRecord::from_serialized(attributes)?;
            self.add(url.clone(), record)?;
            added += 1;
        }
        Ok(added)
    }

    /// Persisted JSON shape; lossless except the single-age collapse.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        let entries: Map<String, Value> = self
            .entries
            .iter()
            .map(|(url, record)| (url.clone(), record.to_serializable()))
            .collect();
        Value::Object(entries)
    }

    pub fn to_json_string(&self, options: WriteOptions) -> Result<String> {
        let value = self.to_json_value();
        let Some(indent) = options.indent else {
            return Ok(serde_json::to_string(&value)?);
        };
        let indent = " ".repeat(indent);
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        value.serialize(&mut serializer)?;
        String::from_utf8(buffer).map_err(|err| BookmergeError::InvalidSnapshot {
            reason: err.to_string(),
        })
    }

    // -- Files ---------------------------------------------------------------------------

    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        let mut table = Self::new();
        table.read_json_into(path)?;
        Ok(table)
    }

    /// Merge a persisted table file into `self` through [`Self::add`].
    pub fn read_json_into(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = fs_err::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;
        let added = self.extend_from_json_value(&value)?;
        log::info!("read {added} addresses from {}", path.display());
        Ok(added)
    }

    /// Atomically replace `path` with the serialized table.
    pub fn write_json(&self, path: impl AsRef<Path>, options: WriteOptions) -> Result<()> {
        let path = path.as_ref();
        let payload = self.to_json_string(options)?;
        let mut file = AtomicWriteFile::open(path)?;
        file.write_all(payload.as_bytes())?;
        file.commit()?;
        log::info!("wrote {} addresses to {}", self.len(), path.display());
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AddressTable {
    type Item = (&'a String, &'a AttributeRecord);
    type IntoIter = std::collections::btree_map::Iter<'a, String, AttributeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Field;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> AddressTable {
        let mut record = AttributeRecord::new();
        record.set(Field::Label, "x", true).unwrap();
        record.set(Field::Age, 100, true).unwrap();
        let mut table = AddressTable::new();
        table.add("http://x.com", record).unwrap();
        table
    }

    #[test]
    fn json_value_collapses_single_age() {
        let value = sample().to_json_value();
        assert_eq!(value, json!({"http://x.com": [["x"], "100", [], [], [], []]}));
    }

    #[test]
    fn non_object_snapshot_is_rejected() {
        assert!(AddressTable::from_json_value(&json!([1, 2])).is_err());
    }

    #[test]
    fn non_array_entries_are_skipped() {
        let table = AddressTable::from_json_value(&json!({
            "http://a.com": [["a"], [], [], [], [], []],
            "http://b.com": "broken"
        }))
        .unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.contains("http://a.com"));
    }

    #[test]
    fn write_then_read_restores_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("addr.json");
        let table = sample();
        table.write_json(&path, WriteOptions::pretty(2)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"http://x.com\""));

        let reread = AddressTable::read_json(&path).unwrap();
        assert_eq!(reread, table);
    }

    #[test]
    fn reading_into_populated_table_rejects_duplicates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("addr.json");
        sample().write_json(&path, WriteOptions::compact()).unwrap();

        let mut table = sample();
        let err = table.read_json_into(&path).unwrap_err();
        assert!(matches!(err, BookmergeError::DuplicateKey { .. }));
    }
}
