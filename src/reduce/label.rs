//! Label override and de-duplication.

use std::collections::BTreeSet;

use crate::io::overrides::LabelOverrides;
use crate::table::AddressTable;
use crate::types::Field;

/// Replace labels for every overridden URL present in the table; returns how many
/// records were changed. URLs missing from the table are ignored.
pub fn apply_label_overrides(table: &mut AddressTable, overrides: &LabelOverrides) -> usize {
    let mut applied = 0;
    for (url, labels) in overrides.iter() {
        if let Some(record) = table.get_mut(url) {
            record.set_text(Field::Label, labels.to_vec(), true);
            applied += 1;
        }
    }
    applied
}

/// Trimmed, distinct, sorted labels.
#[must_use]
pub fn reduce_labels(labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .map(|label| label.trim().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
