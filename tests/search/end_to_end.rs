//! The worked examples of the two-role catalog.

use crate::common::{result_ids, sample_searcher};
use iamlens::{MatchSpan, SearchFilters};

#[test]
fn test_permission_query_matches_both_roles() {
    let searcher = sample_searcher();
    let outcome = searcher.search(&SearchFilters::new().with_attribute("get"));

    assert_eq!(result_ids(&outcome), vec!["a.viewer", "b.admin"]);
    assert!(outcome.is_filtered);

    let first = &outcome.results[0];
    assert_eq!(first.matches.len(), 1);
    assert_eq!(first.matches[0].key, "permissions");
    assert_eq!(first.matches[0].value, "a.get");
    assert_eq!(first.matches[0].spans, vec![MatchSpan::new(2, 4)]);

    let second = &outcome.results[1];
    assert_eq!(second.matches.len(), 1);
    assert_eq!(second.matches[0].value, "b.get");
    assert_eq!(second.matches[0].spans, vec![MatchSpan::new(2, 4)]);
}

#[test]
fn test_id_query_records_inclusive_span() {
    let searcher = sample_searcher();
    let outcome = searcher.search(&SearchFilters::new().with_id("a."));

    assert_eq!(result_ids(&outcome), vec!["a.viewer"]);
    let matched = &outcome.results[0].matches;
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].key, "id");
    assert_eq!(matched[0].spans, vec![MatchSpan::new(0, 1)]);
}

#[test]
fn test_all_empty_filters_return_everything_unannotated() {
    let searcher = sample_searcher();
    let filters = SearchFilters::new()
        .with_id("")
        .with_name("")
        .with_attribute("");
    let outcome = searcher.search(&filters);

    assert_eq!(outcome.len(), 2);
    assert!(!outcome.is_filtered);
    assert!(outcome.results.iter().all(|r| r.matches.is_empty()));
}

#[test]
fn test_no_hits_is_empty_not_error() {
    let searcher = sample_searcher();
    let outcome = searcher.search(&SearchFilters::new().with_name("nothing like this"));
    assert!(outcome.is_empty());
    assert!(outcome.is_filtered);
}

#[test]
fn test_original_index_points_into_catalog() {
    let searcher = sample_searcher();
    let outcome = searcher.search(&SearchFilters::new().with_attribute("delete"));
    assert_eq!(outcome.results[0].original_index, 1);
    assert_eq!(
        searcher.items()[outcome.results[0].original_index].id,
        "b.admin"
    );
}
