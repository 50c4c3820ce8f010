//! Post-merge reduction passes.
//!
//! Passes run in a fixed order: locations, labels, descriptions, source files, then
//! removal of configured empty markers. Duplicate snapshots for the review reports are
//! taken right after the pass that produces them.

pub mod description;
pub mod filename;
pub mod label;
pub mod location;
pub mod source_file;

use std::collections::{BTreeMap, BTreeSet};

pub use filename::reduce_filename;
pub use location::reduce_locations;
pub use source_file::common_prefix_depth;

use crate::io::overrides::{DirectoryLabels, LabelOverrides};
use crate::table::AddressTable;
use crate::types::{CompiledRules, Field};

/// What a pipeline run changed, plus the multi-value leftovers that need review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReductionReport {
    /// URL → locations, for URLs still holding more than one location.
    pub duplicate_locations: BTreeMap<String, Vec<String>>,
    pub duplicate_labels: BTreeMap<String, Vec<String>>,
    pub duplicate_descriptions: BTreeMap<String, Vec<String>>,
    pub labels_overridden: usize,
    pub descriptions_joined: usize,
    pub descriptions_overridden: usize,
    /// Leading directory segments removed from every source-file path.
    pub source_prefix_depth: usize,
    pub empty_values_removed: usize,
}

impl ReductionReport {
    /// Every distinct location that appears in a duplicate group, sorted.
    #[must_use]
    pub fn duplicate_location_values(&self) -> Vec<String> {
        self.duplicate_locations
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct duplicate groups, each sorted, in sorted order.
    #[must_use]
    pub fn duplicate_location_sets(&self) -> Vec<Vec<String>> {
        self.duplicate_locations
            .values()
            .map(|locations| {
                let mut group = locations.clone();
                group.sort();
                group
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Configured reduction passes over an [`AddressTable`].
#[derive(Debug, Clone, Default)]
pub struct ReductionPipeline {
    rules: CompiledRules,
    label_overrides: LabelOverrides,
    directory_labels: DirectoryLabels,
}

impl ReductionPipeline {
    #[must_use]
    pub fn new(rules: CompiledRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label_overrides(mut self, overrides: LabelOverrides) -> Self {
        self.label_overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_directory_labels(mut self, labels: DirectoryLabels) -> Self {
        self.directory_labels = labels;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &CompiledRules {
        &self.rules
    }

    /// Run every pass in order.
    pub fn run(&self, table: &mut AddressTable) -> ReductionReport {
        let mut report = ReductionReport {
            duplicate_locations: self.reduce_locations(table),
            ..ReductionReport::default()
        };

        report.labels_overridden = label::apply_label_overrides(table, &self.label_overrides);
        report.duplicate_labels = self.reduce_labels(table);

        report.descriptions_joined =
            description::join_descriptions(table, &self.rules.description_join_urls);
        report.descriptions_overridden =
            description::apply_description_overrides(table, &self.rules.description_overrides);
        report.duplicate_descriptions = self.reduce_descriptions(table);

        report.source_prefix_depth = source_file::reduce_source_files(
            table,
            &self.directory_labels,
            &self.rules.filename_drop_strings,
        );

        report.empty_values_removed = table.clean_all(&self.rules.empty_value_drop_set);

        tracing::info!(
            target = "bookmerge::reduce",
            addresses = table.len(),
            duplicate_locations = report.duplicate_locations.len(),
            duplicate_labels = report.duplicate_labels.len(),
            duplicate_descriptions = report.duplicate_descriptions.len(),
            labels_overridden = report.labels_overridden,
            source_prefix_depth = report.source_prefix_depth,
            empty_values_removed = report.empty_values_removed,
            "reduction finished"
        );
        report
    }

    /// Location pass; returns URLs left with several locations.
    pub fn reduce_locations(&self, table: &mut AddressTable) -> BTreeMap<String, Vec<String>> {
        let mut duplicates = BTreeMap::new();
        for (url, record) in table.records_mut() {
            let reduced = location::reduce_locations(record.locations(), &self.rules);
            if reduced.len() > 1 {
                duplicates.insert(url.clone(), reduced.clone());
            }
            record.set_text(Field::Location, reduced, true);
        }
        tracing::debug!(
            target = "bookmerge::reduce",
            remaining = duplicates.len(),
            "addresses with multiple locations"
        );
        duplicates
    }

    /// Label de-duplication (after overrides); returns URLs left with several labels.
    pub fn reduce_labels(&self, table: &mut AddressTable) -> BTreeMap<String, Vec<String>> {
        let mut duplicates = BTreeMap::new();
        for (url, record) in table.records_mut() {
            let reduced = label::reduce_labels(record.labels());
            if reduced.len() > 1 {
                duplicates.insert(url.clone(), reduced.clone());
            }
            record.set_text(Field::Label, reduced, true);
        }
        duplicates
    }

    /// Description de-duplication; returns URLs left with several descriptions.
    pub fn reduce_descriptions(&self, table: &mut AddressTable) -> BTreeMap<String, Vec<String>> {
        let mut duplicates = BTreeMap::new();
        for (url, record) in table.records_mut() {
            let reduced = description::reduce_descriptions(record.descriptions());
            if reduced.len() > 1 {
                duplicates.insert(url.clone(), reduced.clone());
            }
            record.set_text(Field::Description, reduced, true);
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MergeConfig, RawRecord};

    #[test]
    fn pipeline_reports_leftover_duplicates() {
        let mut table = AddressTable::new();
        table.merge_raw_records([
            RawRecord::new("http://a.com")
                .with_label("A")
                .with_location("Bookmarks Menu::news")
                .with_description("first"),
            RawRecord::new("http://a.com")
                .with_label("A too")
                .with_location("sports")
                .with_description("second"),
            RawRecord::new("http://b.com")
                .with_label("None")
                .with_location("folder1::folder1::sub"),
            RawRecord::new("http://b.com").with_location("folder1::sub"),
        ]);

        let rules = MergeConfig::builder()
            .drop_prefix("Bookmarks Menu")
            .drop_empty_value("None")
            .build()
            .compile()
            .unwrap();
        let report = ReductionPipeline::new(rules).run(&mut table);

        assert_eq!(
            report.duplicate_locations.get("http://a.com").unwrap(),
            &["news", "sports"]
        );
        assert!(!report.duplicate_locations.contains_key("http://b.com"));
        assert_eq!(report.duplicate_labels.get("http://a.com").unwrap(), &["A", "A too"]);
        assert_eq!(report.duplicate_descriptions.len(), 1);
        assert_eq!(report.empty_values_removed, 1);
        assert_eq!(
            table.get("http://b.com").unwrap().locations(),
            ["folder1::folder1::sub"]
        );
        assert!(table.get("http://b.com").unwrap().labels().is_empty());

        assert_eq!(report.duplicate_location_values(), ["news", "sports"]);
        assert_eq!(
            report.duplicate_location_sets(),
            vec![vec!["news".to_string(), "sports".to_string()]]
        );
    }

    #[test]
    fn label_overrides_run_before_duplicate_snapshot() {
        let mut table = AddressTable::new();
        table.merge_raw_records([
            RawRecord::new("http://a.com").with_label("one"),
            RawRecord::new("http://a.com").with_label("two"),
        ]);
        let mut overrides = LabelOverrides::new();
        overrides.insert("http://a.com", ["chosen"]);
        let report = ReductionPipeline::default()
            .with_label_overrides(overrides)
            .run(&mut table);
        assert_eq!(report.labels_overridden, 1);
        assert!(report.duplicate_labels.is_empty());
        assert_eq!(table.get("http://a.com").unwrap().labels(), ["chosen"]);
    }
}
