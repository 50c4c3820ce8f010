//! Key-level mutations and the raw-record merge engine.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::lifecycle::AddressTable;
use crate::error::{BookmergeError, Result};
use crate::types::{AttributeRecord, Field, RawRecord, RawShape};

#[allow(clippy::expect_used)]
static WORD_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w").expect("word-character regex"));

/// Counters reported by [`AddressTable::merge_raw_records`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub records_seen: usize,
    /// URLs not previously in the table.
    pub inserted: usize,
    /// Records folded into an existing URL.
    pub merged: usize,
    /// Records whose length matched neither known layout.
    pub malformed: usize,
}

impl AddressTable {
    /// Insert a new URL; fails if it is already present.
    pub fn add(&mut self, url: impl Into<String>, record: AttributeRecord) -> Result<()> {
        let url = url.into();
        if self.entries.contains_key(&url) {
            return Err(BookmergeError::DuplicateKey { url });
        }
        self.entries.insert(url, record);
        Ok(())
    }

    /// Insert or overwrite; returns the previous record.
    pub fn replace(&mut self, url: impl Into<String>, record: AttributeRecord) -> Option<AttributeRecord> {
        self.entries.insert(url.into(), record)
    }

    pub fn delete(&mut self, url: &str) -> Option<AttributeRecord> {
        self.entries.remove(url)
    }

    /// Fold extractor output into the table.
    ///
    /// A URL seen for the first time gets each attribute as a one-value list. A
    /// repeated URL keeps the oldest age, appends a label that differs from the first
    /// one held, and for tags, location, description, and source file appends the
    /// incoming value when it differs from the first one held (never duplicating a
    /// value already present). Descriptions without any word character are ignored on
    /// repeats.
    pub fn merge_raw_records<I>(&mut self, records: I) -> MergeStats
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut stats = MergeStats::default();
        for raw in records {
            stats.records_seen += 1;
            if let RawShape::Malformed { len } = raw.shape {
                stats.malformed += 1;
                tracing::warn!(
                    target = "bookmerge::merge",
                    url = %raw.url,
                    len,
                    "raw record length unknown; description and source file skipped"
                );
            }
            match self.entries.get_mut(&raw.url) {
                Some(existing) => {
                    merge_into_existing(existing, &raw);
                    stats.merged += 1;
                }
                None => {
                    let record = record_from_raw(&raw);
                    self.entries.insert(raw.url, record);
                    stats.inserted += 1;
                }
            }
        }
        tracing::info!(
            target = "bookmerge::merge",
            seen = stats.records_seen,
            inserted = stats.inserted,
            merged = stats.merged,
            malformed = stats.malformed,
            addresses = self.len(),
            "merged raw records"
        );
        stats
    }

    /// Remove `drop_values` from every record; returns the number of values removed.
    pub fn clean_all(&mut self, drop_values: &BTreeSet<String>) -> usize {
        self.entries
            .values_mut()
            .map(|record| record.remove_values(drop_values))
            .sum()
    }

    pub fn unique_all(&mut self, sort: bool) {
        for record in self.entries.values_mut() {
            record.unique(sort);
        }
    }
}

fn record_from_raw(raw: &RawRecord) -> AttributeRecord {
    let mut record = AttributeRecord::new();
    let text_slots = [
        (Field::Label, &raw.label),
        (Field::Tags, &raw.tag),
        (Field::Location, &raw.location),
        (Field::Description, &raw.description),
        (Field::SourceFile, &raw.source_file),
    ];
    for (field, value) in text_slots {
        if let Some(value) = value {
            record.set_text(field, vec![value.clone()], true);
        }
    }
    record.set_ages(raw.age, true);
    record
}

fn merge_into_existing(record: &mut AttributeRecord, raw: &RawRecord) {
    if let Some(age) = raw.age {
        if record.first_age().is_none_or(|held| held > age) {
            record.set_ages([age], true);
        }
    }

    let description = raw
        .description
        .as_deref()
        .filter(|text| WORD_CHAR.is_match(text));
    let text_slots = [
        (Field::Label, raw.label.as_deref()),
        (Field::Tags, raw.tag.as_deref()),
        (Field::Location, raw.location.as_deref()),
        (Field::Description, description),
        (Field::SourceFile, raw.source_file.as_deref()),
    ];
    for (field, incoming) in text_slots {
        let Some(incoming) = incoming.map(str::trim) else {
            continue;
        };
        let first = record
            .text(field)
            .and_then(|values| values.first())
            .map(String::as_str);
        if first != Some(incoming) {
            record.set_text(field, vec![incoming.to_string()], false);
        }
    }
}
