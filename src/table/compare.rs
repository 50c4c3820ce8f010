//! Comparing and combining two address tables.

use super::lifecycle::AddressTable;
use crate::types::{MergeRule, TableDiff};

impl AddressTable {
    /// Key-by-key comparison of `a` against `b`.
    #[must_use]
    pub fn compare_tables(a: &Self, b: &Self) -> TableDiff {
        let mut diff = TableDiff::default();
        for (url, record) in &a.entries {
            match b.entries.get(url) {
                Some(other) if other != record => diff.differing.push(url.clone()),
                Some(_) => {}
                None => diff.only_a.push(url.clone()),
            }
        }
        diff.only_b = b
            .entries
            .keys()
            .filter(|url| !a.entries.contains_key(*url))
            .cloned()
            .collect();
        diff
    }

    /// Combine two tables. URLs in only one table pass through; shared URLs are
    /// resolved by `rule`.
    #[must_use]
    pub fn merge_tables(a: &Self, b: &Self, rule: MergeRule) -> Self {
        let mut merged = a.clone();
        for (url, theirs) in &b.entries {
            match merged.entries.get_mut(url) {
                None => {
                    merged.entries.insert(url.clone(), theirs.clone());
                }
                Some(ours) => match rule {
                    MergeRule::Union => *ours = ours.union(theirs),
                    MergeRule::PreferA => {}
                    MergeRule::PreferB => *ours = theirs.clone(),
                },
            }
        }
        tracing::debug!(
            target = "bookmerge::merge",
            rule = ?rule,
            left = a.len(),
            right = b.len(),
            merged = merged.len(),
            "merged tables"
        );
        merged
    }
}
