//! Source-file path shortening.
//!
//! Runs in two steps that must see the whole table: first the number of leading
//! directory segments shared by every source directory is computed, then each path is
//! trimmed by that count and rewritten as `label:::reduced_basename`.

use std::collections::BTreeSet;
use std::path::MAIN_SEPARATOR;

use super::filename::reduce_filename;
use crate::constants::VALUE_SEPARATOR;
use crate::io::overrides::DirectoryLabels;
use crate::table::AddressTable;
use crate::types::Field;

/// Directory part of a `separator`-delimited path; `""` when there is none.
fn dirname(path: &str, separator: char) -> &str {
    match path.rfind(separator) {
        Some(0) => &path[..separator.len_utf8()],
        Some(index) => &path[..index],
        None => "",
    }
}

/// Count of leading segments identical across every distinct directory. A directory
/// with fewer segments ends the shared run at its length.
#[must_use]
pub fn common_prefix_depth<'a, I>(paths: I, separator: char) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let directories: BTreeSet<&str> = paths
        .into_iter()
        .map(|path| dirname(path, separator))
        .collect();
    let rows: Vec<Vec<&str>> = directories
        .iter()
        .map(|directory| directory.split(separator).collect())
        .collect();
    let Some(first) = rows.first() else {
        return 0;
    };
    let mut depth = 0;
    for (column, segment) in first.iter().enumerate() {
        if rows.iter().all(|row| row.get(column) == Some(segment)) {
            depth += 1;
        } else {
            break;
        }
    }
    depth
}

fn drop_leading_segments(path: &str, count: usize, separator: char) -> String {
    let mut buffer = [0; 4];
    let separator_text: &str = separator.encode_utf8(&mut buffer);
    path.split(separator)
        .skip(count)
        .collect::<Vec<_>>()
        .join(separator_text)
}

/// Rewrites every record's source files. Returns the shared prefix depth removed.
pub fn reduce_source_files(
    table: &mut AddressTable,
    directory_labels: &DirectoryLabels,
    filename_drop_strings: &[String],
) -> usize {
    reduce_source_files_with_separator(table, directory_labels, filename_drop_strings, MAIN_SEPARATOR)
}

pub(crate) fn reduce_source_files_with_separator(
    table: &mut AddressTable,
    directory_labels: &DirectoryLabels,
    filename_drop_strings: &[String],
    separator: char,
) -> usize {
    let depth = common_prefix_depth(
        table
            .iter()
            .flat_map(|(_, record)| record.source_files().iter().map(String::as_str)),
        separator,
    );
    tracing::debug!(target = "bookmerge::reduce", depth, "dropping shared source-file prefix");

    for (_, record) in table.records_mut() {
        let mut rewritten = BTreeSet::new();
        for path in record.source_files() {
            let trimmed = drop_leading_segments(path, depth, separator);
            let name = reduce_filename(&trimmed, filename_drop_strings);
            let directory = dirname(&trimmed, separator);
            match directory_labels.get(directory) {
                Some(labels) => {
                    for label in labels {
                        rewritten.insert(format!("{label}{VALUE_SEPARATOR}{name}"));
                    }
                }
                None => {
                    rewritten.insert(format!("{directory}{VALUE_SEPARATOR}{name}"));
                }
            }
        }
        record.set_text(Field::SourceFile, rewritten.into_iter().collect(), true);
    }
    depth
}
