//! Pattern search over URLs and attribute values.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

use super::lifecycle::AddressTable;
use crate::constants::VALUE_SEPARATOR;
use crate::error::{BookmergeError, Result};
use crate::types::{AgeValue, AttributeRecord, Field, SearchField, SearchQuery, SearchRequest};

/// How an age pattern is evaluated.
enum AgeMatcher {
    Above(String),
    Below(String),
    Pattern(Regex),
}

impl AgeMatcher {
    fn parse(pattern: &str, ignore_case: bool) -> Result<Self> {
        if let Some(rest) = pattern.strip_prefix('>') {
            Ok(Self::Above(rest.trim().to_string()))
        } else if let Some(rest) = pattern.strip_prefix('<') {
            Ok(Self::Below(rest.trim().to_string()))
        } else {
            build_regex(pattern, ignore_case).map(Self::Pattern)
        }
    }

    /// Number of hits `record` contributes: at most one for a threshold, one per
    /// matching age for a pattern.
    fn hits(&self, record: &AttributeRecord) -> usize {
        match self {
            Self::Above(threshold) => usize::from(
                record
                    .first_age()
                    .is_some_and(|age| compare_age(age, threshold) == Ordering::Greater),
            ),
            Self::Below(threshold) => usize::from(
                record
                    .first_age()
                    .is_some_and(|age| compare_age(age, threshold) == Ordering::Less),
            ),
            Self::Pattern(regex) => record
                .ages()
                .iter()
                .filter(|age| regex.is_match(&age.to_string()))
                .count(),
        }
    }
}

/// Numeric when the threshold parses as a timestamp, lexical otherwise.
fn compare_age(age: AgeValue, threshold: &str) -> Ordering {
    match threshold.parse::<AgeValue>() {
        Ok(limit) => age.cmp(&limit),
        Err(_) => age.to_string().as_str().cmp(threshold),
    }
}

fn build_regex(pattern: &str, ignore_case: bool) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|err| BookmergeError::invalid_pattern(pattern, err))
}

impl AddressTable {
    /// URLs whose selected field matches the request, in table order.
    ///
    /// Age patterns starting with `>` or `<` compare against the first stored age;
    /// records without an age never match those. Any other pattern is a regex tested
    /// against every element of the field (or the URL for [`SearchField::Address`]).
    /// A URL appears once per matching element, so the result may repeat a URL;
    /// [`Self::search_wrapper`] de-duplicates.
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<String>> {
        let candidates: Vec<(&str, &AttributeRecord)> = match &request.url_subset {
            Some(urls) => urls
                .iter()
                .filter_map(|url| self.entries.get_key_value(url))
                .map(|(url, record)| (url.as_str(), record))
                .collect(),
            None => self.iter().collect(),
        };

        let hits: Vec<String> = match request.field {
            SearchField::Address => {
                let regex = build_regex(&request.pattern, request.ignore_case)?;
                candidates
                    .into_iter()
                    .filter(|(url, _)| regex.is_match(url))
                    .map(|(url, _)| url.to_string())
                    .collect()
            }
            SearchField::Attribute(Field::Age) => {
                let matcher = AgeMatcher::parse(&request.pattern, request.ignore_case)?;
                candidates
                    .into_iter()
                    .flat_map(|(url, record)| {
                        std::iter::repeat_n(url.to_string(), matcher.hits(record))
                    })
                    .collect()
            }
            SearchField::Attribute(field) => {
                let regex = build_regex(&request.pattern, request.ignore_case)?;
                candidates
                    .into_iter()
                    .flat_map(|(url, record)| {
                        let matches = record
                            .text(field)
                            .unwrap_or_default()
                            .iter()
                            .filter(|value| regex.is_match(value))
                            .count();
                        std::iter::repeat_n(url.to_string(), matches)
                    })
                    .collect()
            }
        };
        tracing::debug!(
            target = "bookmerge::search",
            pattern = %request.pattern,
            field = %request.field,
            hits = hits.len(),
            "search finished"
        );
        Ok(hits)
    }

    /// Fan a query out over several patterns and/or fields; returns the sorted,
    /// de-duplicated union of every individual search.
    pub fn search_wrapper(&self, query: &SearchQuery, ignore_case: bool) -> Result<Vec<String>> {
        let requests: Vec<SearchRequest> = match query {
            SearchQuery::Single { pattern, field } => vec![SearchRequest::new(pattern.as_str(), *field)],
            SearchQuery::PatternsInField { patterns, field } => patterns
                .iter()
                .map(|pattern| SearchRequest::new(pattern.as_str(), *field))
                .collect(),
            SearchQuery::PatternInFields { pattern, fields } => fields
                .iter()
                .map(|field| SearchRequest::new(pattern.as_str(), *field))
                .collect(),
            SearchQuery::Paired { patterns, fields } => {
                if patterns.len() != fields.len() {
                    return Err(BookmergeError::SearchArity {
                        patterns: patterns.len(),
                        fields: fields.len(),
                    });
                }
                patterns
                    .iter()
                    .zip(fields)
                    .map(|(pattern, field)| SearchRequest::new(pattern.as_str(), *field))
                    .collect()
            }
            SearchQuery::ByField(pairs) => pairs
                .iter()
                .map(|(field, pattern)| SearchRequest::new(pattern.as_str(), *field))
                .collect(),
        };

        let mut union = BTreeSet::new();
        for request in requests {
            union.extend(self.search(&request.ignore_case(ignore_case))?);
        }
        Ok(union.into_iter().collect())
    }

    /// `url::value1:::value2` lines for a set of URLs, ready for display. Ages are
    /// rendered as calendar times. URLs missing from the table are skipped.
    #[must_use]
    pub fn describe_matches(&self, urls: &[String], field: SearchField) -> Vec<String> {
        urls.iter()
            .filter_map(|url| self.entries.get_key_value(url))
            .map(|(url, record)| match field {
                SearchField::Address => url.clone(),
                SearchField::Attribute(Field::Age) => {
                    let ages: Vec<String> = record.ages().iter().map(|age| age.time_str()).collect();
                    format!("{url}::{}", ages.join(VALUE_SEPARATOR))
                }
                SearchField::Attribute(field) => {
                    let values = record.get(field, false).to_strings();
                    format!("{url}::{}", values.join(VALUE_SEPARATOR))
                }
            })
            .collect()
    }
}
