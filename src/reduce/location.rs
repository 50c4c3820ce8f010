//! Location set simplification.

use std::collections::BTreeSet;

use crate::constants::LOCATION_SEPARATOR;
use crate::types::CompiledRules;

/// Rewrite one record's locations.
///
/// Order: trim and de-duplicate, drop configured roots, literal replace-all rules,
/// anchored prefix drops, leftmost-match replace rules (each step strips one leading
/// `::`), underscores to spaces. When several locations remain, any location whose
/// folder path is a contiguous run inside another location's path is dropped, then
/// empties are dropped. A non-empty input never reduces to nothing: the result is at
/// least `[""]`. An empty input stays empty.
#[must_use]
pub fn reduce_locations(values: &[String], rules: &CompiledRules) -> Vec<String> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut reduced: Vec<String> = values
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|value| !rules.location_drop_set.contains(value))
        .collect();

    for rule in &rules.replace_all {
        for value in &mut reduced {
            *value = strip_leading_separator(&value.replace(&rule.pattern, &rule.replacement));
        }
    }
    for prefix in &rules.drop_prefixes {
        for value in &mut reduced {
            let stripped = strip_leading_separator(&prefix.replace(value, ""));
            *value = stripped;
        }
    }
    for (pattern, replacement) in &rules.replace_first {
        for value in &mut reduced {
            let rewritten = strip_leading_separator(&pattern.replace(value, replacement.as_str()));
            *value = rewritten;
        }
    }
    for value in &mut reduced {
        *value = value.replace('_', " ").trim().to_string();
    }

    if reduced.len() > 1 {
        let distinct: Vec<String> = reduced.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        reduced = drop_subsumed(&distinct);
        reduced.retain(|value| !value.is_empty());
    }

    if reduced.is_empty() {
        reduced.push(String::new());
    }
    reduced
}

fn strip_leading_separator(value: &str) -> String {
    value
        .strip_prefix(LOCATION_SEPARATOR)
        .unwrap_or(value)
        .to_string()
}

/// Keep only locations that are not a contiguous folder run inside a longer one.
fn drop_subsumed(locations: &[String]) -> Vec<String> {
    let segments: Vec<Vec<&str>> = locations
        .iter()
        .map(|location| location.split(LOCATION_SEPARATOR).collect())
        .collect();
    locations
        .iter()
        .enumerate()
        .filter(|(index, _)| {
            let candidate = &segments[*index];
            !segments
                .iter()
                .enumerate()
                .any(|(other, path)| other != *index && is_inner_run(candidate, path))
        })
        .map(|(_, location)| location.clone())
        .collect()
}

fn is_inner_run(needle: &[&str], haystack: &[&str]) -> bool {
    needle.len() < haystack.len() && haystack.windows(needle.len()).any(|window| window == needle)
}
