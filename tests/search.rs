//! Integration tests for table search.
//! Tests: regex and age searches, fan-out queries, match listings

use std::collections::BTreeMap;

use bookmerge_core::{
    ADDRESS_SENTINEL, AddressTable, BookmergeError, Field, RawRecord, SearchField, SearchQuery,
    SearchRequest,
};

/// Small table with a spread of ages, folders and tags.
fn library() -> AddressTable {
    let mut table = AddressTable::new();
    table.merge_raw_records([
        RawRecord::new("https://doc.rust-lang.org/book")
            .with_label("The Rust Book")
            .with_age(1_500_000_000)
            .with_tag("rust")
            .with_location("Programming::Rust"),
        RawRecord::new("https://docs.python.org")
            .with_label("Python docs")
            .with_age(1_600_000_000)
            .with_tag("python")
            .with_location("Programming::Python"),
        RawRecord::new("https://news.ycombinator.com")
            .with_label("Hacker News")
            .with_age(1_700_000_000)
            .with_location("News"),
        RawRecord::new("https://example.com/undated").with_label("undated"),
    ]);
    table
}

#[test]
fn address_and_attribute_searches() {
    let table = library();
    let field = SearchField::from_position(ADDRESS_SENTINEL).unwrap();
    assert_eq!(
        table.search(&SearchRequest::new(r"docs?\.", field)).unwrap(),
        ["https://doc.rust-lang.org/book", "https://docs.python.org"]
    );
    assert_eq!(
        table
            .search(&SearchRequest::new("^programming", Field::Location).ignore_case(true))
            .unwrap()
            .len(),
        2
    );
    assert!(
        table
            .search(&SearchRequest::new("^programming", Field::Location))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn age_thresholds_skip_undated_records() {
    let table = library();
    let newer = table
        .search(&SearchRequest::new(">1550000000", Field::Age))
        .unwrap();
    assert_eq!(newer, ["https://docs.python.org", "https://news.ycombinator.com"]);

    let older = table
        .search(&SearchRequest::new("<1550000000", Field::Age))
        .unwrap();
    assert_eq!(older, ["https://doc.rust-lang.org/book"]);
}

#[test]
fn repeated_matches_repeat_the_url_until_wrapped() {
    let mut table = library();
    table.merge_raw_records([
        RawRecord::new("https://doc.rust-lang.org/book").with_tag("rust-book"),
        RawRecord::new("https://doc.rust-lang.org/book").with_tag("learning"),
    ]);
    assert_eq!(
        table.search(&SearchRequest::new("^rust", Field::Tags)).unwrap(),
        ["https://doc.rust-lang.org/book", "https://doc.rust-lang.org/book"]
    );
    let query = SearchQuery::PatternsInField {
        patterns: vec!["^rust".to_string()],
        field: Field::Tags.into(),
    };
    assert_eq!(
        table.search_wrapper(&query, false).unwrap(),
        ["https://doc.rust-lang.org/book"]
    );
}

#[test]
fn text_thresholds_when_age_limit_is_not_a_number() {
    let table = library();
    // "1500000000" < "15z" < "1600000000" as text
    assert_eq!(
        table.search(&SearchRequest::new("<15z", Field::Age)).unwrap(),
        ["https://doc.rust-lang.org/book"]
    );
    assert_eq!(
        table.search(&SearchRequest::new(">15z", Field::Age)).unwrap(),
        ["https://docs.python.org", "https://news.ycombinator.com"]
    );
}

#[test]
fn url_subset_limits_candidates() {
    let table = library();
    let request = SearchRequest::new("o", Field::Label)
        .within(["https://docs.python.org", "https://not-in-table.org"]);
    assert_eq!(table.search(&request).unwrap(), ["https://docs.python.org"]);
}

#[test]
fn fan_out_queries_union_their_hits() {
    let table = library();
    let query = SearchQuery::PatternInFields {
        pattern: "rust".to_string(),
        fields: vec![Field::Tags.into(), Field::Label.into()],
    };
    assert_eq!(
        table.search_wrapper(&query, true).unwrap(),
        ["https://doc.rust-lang.org/book"]
    );

    let mut by_field = BTreeMap::new();
    by_field.insert(SearchField::Attribute(Field::Tags), "python".to_string());
    by_field.insert(SearchField::Address, "ycombinator".to_string());
    assert_eq!(
        table.search_wrapper(&SearchQuery::ByField(by_field), false).unwrap(),
        ["https://docs.python.org", "https://news.ycombinator.com"]
    );

    let mismatched = SearchQuery::Paired {
        patterns: vec!["a".to_string(), "b".to_string()],
        fields: vec![SearchField::Address],
    };
    assert!(matches!(
        table.search_wrapper(&mismatched, false),
        Err(BookmergeError::SearchArity {
            patterns: 2,
            fields: 1
        })
    ));
}

#[test]
fn bad_regex_is_reported() {
    let table = library();
    let err = table
        .search(&SearchRequest::new("(unclosed", Field::Label))
        .unwrap_err();
    assert!(matches!(err, BookmergeError::InvalidPattern { .. }));
}

#[test]
fn describe_matches_renders_values() {
    let table = library();
    let urls = vec![
        "https://docs.python.org".to_string(),
        "https://missing.example".to_string(),
    ];
    assert_eq!(
        table.describe_matches(&urls, Field::Location.into()),
        ["https://docs.python.org::Programming::Python"]
    );
    assert_eq!(
        table.describe_matches(&urls, Field::Age.into()),
        ["https://docs.python.org::2020-09-13 12:26:40"]
    );
    assert_eq!(
        table.describe_matches(&urls, SearchField::Address),
        ["https://docs.python.org"]
    );
}
