//! AND across fields, OR within the attribute field, order preservation.

use crate::common::{gcp_roles, gcp_searcher, result_ids};
use iamlens::{search_field, Role, SearchFilters, Searcher};

#[test]
fn test_filters_compose_with_and() {
    let searcher = gcp_searcher();
    let outcome = searcher.search(&SearchFilters::new().with_id("storage").with_name("viewer"));
    assert_eq!(result_ids(&outcome), vec!["storage.objectViewer"]);

    let matches = &outcome.results[0].matches;
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].key, "id");
    assert_eq!(matches[1].key, "name");
}

#[test]
fn test_attribute_match_records_every_matching_permission() {
    let searcher = gcp_searcher();
    let outcome = searcher.search(&SearchFilters::new().with_attribute("buckets"));
    assert_eq!(result_ids(&outcome), vec!["storage.admin", "viewer"]);

    let admin = &outcome.results[0];
    let values: Vec<&str> = admin.matches.iter().map(|m| m.value.as_str()).collect();
    assert_eq!(
        values,
        vec![
            "storage.buckets.create",
            "storage.buckets.delete",
            "storage.buckets.get",
            "storage.buckets.list",
        ]
    );
}

#[test]
fn test_matches_concatenate_in_field_order() {
    let searcher = gcp_searcher();
    let filters = SearchFilters::new()
        .with_id("storage")
        .with_name("admin")
        .with_attribute("objects");
    let outcome = searcher.search(&filters);
    assert_eq!(result_ids(&outcome), vec!["storage.admin"]);

    let keys: Vec<&str> = outcome.results[0]
        .matches
        .iter()
        .map(|m| m.key.as_str())
        .collect();
    assert_eq!(keys, vec!["id", "name", "permissions"]);
}

#[test]
fn test_case_insensitive_everywhere() {
    let searcher = gcp_searcher();
    let upper = searcher.search(&SearchFilters::new().with_attribute("OBJECTS.GET"));
    let lower = searcher.search(&SearchFilters::new().with_attribute("objects.get"));
    assert_eq!(result_ids(&upper), result_ids(&lower));
    assert_eq!(result_ids(&upper), vec!["storage.admin", "storage.objectViewer"]);
}

#[test]
fn test_results_keep_source_order() {
    let mut roles = gcp_roles();
    roles.reverse();
    let searcher = Searcher::new(roles, Role::accessors());
    let outcome = searcher.search(&SearchFilters::new().with_attribute("get"));
    assert_eq!(
        result_ids(&outcome),
        vec!["storage.objectViewer", "storage.admin", "compute.viewer"]
    );
}

#[test]
fn test_intersection_of_single_field_searches() {
    let searcher = gcp_searcher();
    let both = searcher.search(&SearchFilters::new().with_id("e").with_name("view"));
    let by_id = searcher.search(&SearchFilters::new().with_id("e"));
    let by_name = searcher.search(&SearchFilters::new().with_name("view"));

    for id in result_ids(&both) {
        assert!(result_ids(&by_id).contains(&id));
        assert!(result_ids(&by_name).contains(&id));
    }
    let expected: Vec<&str> = result_ids(&by_id)
        .into_iter()
        .filter(|id| result_ids(&by_name).contains(id))
        .collect();
    assert_eq!(result_ids(&both), expected);
}

#[test]
fn test_reload_replaces_index() {
    let mut searcher = gcp_searcher();
    assert!(searcher.contains("viewer"));

    searcher.reload(vec![Role::new(
        "pubsub.publisher",
        "Pub/Sub Publisher",
        vec!["pubsub.topics.publish".to_string()],
    )]);

    assert!(!searcher.contains("viewer"));
    assert!(searcher
        .search(&SearchFilters::new().with_attribute("buckets"))
        .is_empty());
    let outcome = searcher.search(&SearchFilters::new().with_attribute("publish"));
    assert_eq!(outcome.len(), 1);
}

#[test]
fn test_search_field_agrees_with_searcher() {
    let roles = gcp_roles();
    let hits = search_field(&roles, |r: &Role| r.name.as_str(), "storage", "name");
    let searcher = gcp_searcher();
    let outcome = searcher.search(&SearchFilters::new().with_name("storage"));
    let from_field: Vec<&str> = hits.iter().map(|h| h.item.id.as_str()).collect();
    assert_eq!(from_field, result_ids(&outcome));
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_build_matches_sequential() {
    let sequential = gcp_searcher();
    let parallel = Searcher::new_parallel(gcp_roles(), Role::accessors());
    assert_eq!(sequential.index(), parallel.index());
}
