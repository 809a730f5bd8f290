//! Attribute match truncation for display.

use crate::common::{gcp_roles, wide_role};
use iamlens::config::DEFAULT_MAX_ATTRIBUTE_MATCHES;
use iamlens::search::attribute_preview;
use iamlens::{Role, SearchFilters, Searcher};

#[test]
fn test_preview_truncates_but_counts_everything() {
    let mut roles = gcp_roles();
    roles.push(wide_role(25));
    let searcher = Searcher::new(roles, Role::accessors());
    let outcome = searcher.search(&SearchFilters::new().with_attribute("wide.resource"));

    assert_eq!(outcome.len(), 1);
    assert_eq!(outcome.results[0].matches.len(), 25);

    let preview = outcome.preview(0, DEFAULT_MAX_ATTRIBUTE_MATCHES).unwrap();
    assert_eq!(preview.shown.len(), 10);
    assert_eq!(preview.total, 25);
    assert_eq!(preview.hidden(), 15);
    assert_eq!(preview.shown[0].value, "wide.resource0.get");
}

#[test]
fn test_preview_skips_id_and_name_matches() {
    let searcher = Searcher::new(vec![wide_role(3)], Role::accessors());
    let filters = SearchFilters::new().with_id("wide").with_attribute("get");
    let outcome = searcher.search(&filters);

    let result = &outcome.results[0];
    assert_eq!(result.matches.len(), 4);
    let preview = attribute_preview(result, "permissions", 2);
    assert_eq!(preview.total, 3);
    assert!(preview.shown.iter().all(|m| m.key == "permissions"));
}

#[test]
fn test_preview_without_attribute_filter_is_empty() {
    let searcher = Searcher::new(gcp_roles(), Role::accessors());
    let outcome = searcher.search(&SearchFilters::new().with_name("admin"));
    let preview = outcome.preview(0, 10).unwrap();
    assert_eq!(preview.total, 0);
    assert_eq!(preview.hidden(), 0);
    assert!(outcome.preview(99, 10).is_none());
}
