//! Source-file basename reduction.
//!
//! Bookmark exports are usually saved repeatedly with a date in the name
//! (`bookmarks-2019-03-02.html`, `bookmarks_20090724a.html`). Stripping those parts
//! lets repeated exports of the same browser profile collapse to one short name.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// Date shapes removed in order. Each removes every occurrence of the first match.
#[allow(clippy::expect_used)]
static DATE_PATTERNS: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        r"[0-9]{8}[A-Za-z]$",
        r"[0-9]{8}",
        r"[0-9]{4}-[0-9]{2}-[0-9]{2}",
        r"[0-9]{2}-[0-9]{2}-[0-9]{2}",
    ]
    .map(|pattern| Regex::new(pattern).expect("date pattern"))
});

/// Basename of `path` without extension, drop strings, or embedded dates.
///
/// Returns an empty string when no ASCII letter survives. Runs of `_` or `-` are
/// collapsed and `_`, `-`, space, and `.` are trimmed from both ends.
#[must_use]
pub fn reduce_filename<S: AsRef<str>>(path: &str, drop_strings: &[S]) -> String {
    let mut name = Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    for drop in drop_strings {
        let drop = drop.as_ref();
        if !drop.is_empty() {
            name = name.replace(drop, "");
        }
    }

    for pattern in DATE_PATTERNS.iter() {
        if let Some(found) = pattern.find(&name) {
            let matched = found.as_str().to_string();
            name = name.replace(&matched, "");
        }
    }

    if !name.is_empty() {
        if name.chars().any(|c| c.is_ascii_alphabetic()) {
            while name.contains("__") {
                name = name.replace("__", "_");
            }
            while name.contains("--") {
                name = name.replace("--", "-");
            }
        } else {
            name.clear();
        }
    }

    name.trim_matches(|c| matches!(c, '_' | '-' | ' ' | '.'))
        .to_string()
}
