//! Description joining, overrides, and de-duplication.

use std::collections::{BTreeMap, BTreeSet};

use crate::table::AddressTable;
use crate::types::Field;

/// For each listed URL, split every description on newlines and store the distinct
/// lines rejoined as a single description. Returns the number of URLs rewritten.
pub fn join_descriptions(table: &mut AddressTable, urls: &[String]) -> usize {
    let mut joined = 0;
    for url in urls {
        let Some(record) = table.get_mut(url) else {
            continue;
        };
        let lines: BTreeSet<&str> = record
            .descriptions()
            .iter()
            .flat_map(|description| description.split('\n'))
            .collect();
        let combined = lines.into_iter().collect::<Vec<_>>().join("\n");
        record.set_text(Field::Description, vec![combined], true);
        joined += 1;
    }
    joined
}

/// Replace descriptions outright for configured URLs present in the table.
pub fn apply_description_overrides(
    table: &mut AddressTable,
    overrides: &BTreeMap<String, Vec<String>>,
) -> usize {
    let mut applied = 0;
    for (url, descriptions) in overrides {
        if let Some(record) = table.get_mut(url) {
            record.set_text(Field::Description, descriptions.clone(), true);
            applied += 1;
        }
    }
    applied
}

/// Whitespace- and newline-trimmed, distinct, sorted descriptions.
#[must_use]
pub fn reduce_descriptions(descriptions: &[String]) -> Vec<String> {
    descriptions
        .iter()
        .map(|description| description.trim().trim_matches('\n').to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
