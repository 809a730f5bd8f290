// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Composite search across id, name and attribute filters.
//!
//! Filters compose with AND across fields: each active filter narrows the
//! working set left by the previous one. Within the attribute field it is OR:
//! an entity survives if any of its attributes matches, and every matching
//! attribute is recorded.
//!
//! ```text
//! all entities ──id──▶ working set ──name──▶ working set ──attribute──▶ results
//!                                                 │
//!                                   InvertedIndex ┘ (owner ids of matching keys)
//! ```
//!
//! Results keep source order. No relevance ranking happens here.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::field::{match_candidates, search_field_indexed};
use super::matcher::Needle;
use crate::entity::Accessors;
use crate::index::InvertedIndex;
use crate::types::{FieldMatch, SearchResult, FIELD_ID, FIELD_NAME};

/// Per-field queries. `None` and `Some("")` both mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub id: Option<String>,
    pub name: Option<String>,
    pub attribute: Option<String>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, query: impl Into<String>) -> Self {
        self.id = Some(query.into());
        self
    }

    pub fn with_name(mut self, query: impl Into<String>) -> Self {
        self.name = Some(query.into());
        self
    }

    pub fn with_attribute(mut self, query: impl Into<String>) -> Self {
        self.attribute = Some(query.into());
        self
    }

    /// True if any filter is non-empty.
    pub fn is_filtered(&self) -> bool {
        active(&self.id).is_some() || active(&self.name).is_some() || active(&self.attribute).is_some()
    }
}

fn active(query: &Option<String>) -> Option<&str> {
    query.as_deref().filter(|q| !q.is_empty())
}

/// The first `limit` attribute matches of a result plus the true total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePreview<'r> {
    pub shown: &'r [FieldMatch],
    pub total: usize,
}

impl AttributePreview<'_> {
    /// Matches left out of `shown`.
    pub fn hidden(&self) -> usize {
        self.total - self.shown.len()
    }
}

/// Truncate a result's attribute matches for display.
///
/// Attribute matches are always recorded after id and name matches, so they
/// form one contiguous tail of `matches`.
pub fn attribute_preview<'r, T>(
    result: &'r SearchResult<T>,
    attribute_key: &str,
    limit: usize,
) -> AttributePreview<'r> {
    let matches = &result.matches;
    let start = matches
        .iter()
        .position(|m| m.key == attribute_key)
        .unwrap_or(matches.len());
    let tail = &matches[start..];
    AttributePreview {
        shown: &tail[..tail.len().min(limit)],
        total: tail.len(),
    }
}

/// Everything a listing needs to render one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<'a, T> {
    pub results: Vec<SearchResult<&'a T>>,
    pub is_filtered: bool,
    pub attribute_key: &'static str,
}

impl<'a, T> SearchOutcome<'a, T> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Attribute preview of the result at `position`.
    pub fn preview(&self, position: usize, limit: usize) -> Option<AttributePreview<'_>> {
        self.results
            .get(position)
            .map(|result| attribute_preview(result, self.attribute_key, limit))
    }
}

struct Candidate<'a, T> {
    index: usize,
    item: &'a T,
    matches: Vec<FieldMatch>,
}

/// Narrow the working set by one single-valued field.
fn narrow<'a, T>(
    working: Vec<Candidate<'a, T>>,
    accessor: fn(&T) -> &str,
    query: &str,
    field_key: &str,
) -> Vec<Candidate<'a, T>> {
    let hits = search_field_indexed(
        working.iter().map(|c| (c.index, c.item)),
        accessor,
        query,
        field_key,
    );
    // hits is an ordered subsequence of working
    let mut hits = hits.into_iter().peekable();
    working
        .into_iter()
        .filter_map(|mut candidate| {
            let hit = hits.next_if(|h| h.index == candidate.index)?;
            candidate.matches.extend(hit.matched);
            Some(candidate)
        })
        .collect()
}

/// Run every active filter over `items` and annotate the survivors.
///
/// `index` must have been built from `items` with the same accessors.
pub fn search<'a, T>(
    items: &'a [T],
    accessors: &Accessors<T>,
    index: &InvertedIndex,
    filters: &SearchFilters,
) -> SearchOutcome<'a, T> {
    let mut working: Vec<Candidate<'a, T>> = items
        .iter()
        .enumerate()
        .map(|(index, item)| Candidate {
            index,
            item,
            matches: Vec::new(),
        })
        .collect();

    if let Some(query) = active(&filters.id) {
        working = narrow(working, accessors.id, query, FIELD_ID);
    }

    if let Some(query) = active(&filters.name) {
        working = narrow(working, accessors.name, query, FIELD_NAME);
    }

    if let Some(needle) = active(&filters.attribute).and_then(Needle::new) {
        let owners: BTreeSet<&str> = index.lookup_needle(&needle);
        working.retain(|c| owners.contains((accessors.id)(c.item)));
        for candidate in &mut working {
            let matched = match_candidates(
                &needle,
                (accessors.attributes)(candidate.item),
                accessors.attribute_key,
            );
            debug_assert!(
                !matched.is_empty(),
                "index owner {} has no matching attribute",
                (accessors.id)(candidate.item)
            );
            candidate.matches.extend(matched);
        }
    }

    SearchOutcome {
        results: working
            .into_iter()
            .map(|c| SearchResult {
                item: c.item,
                matches: c.matches,
                original_index: c.index,
            })
            .collect(),
        is_filtered: filters.is_filtered(),
        attribute_key: accessors.attribute_key,
    }
}

/// An immutable dataset snapshot with its index, ready to search.
///
/// Reloading replaces the snapshot and rebuilds the index from scratch.
#[derive(Debug, Clone)]
pub struct Searcher<T> {
    items: Vec<T>,
    accessors: Accessors<T>,
    index: InvertedIndex,
    positions: HashMap<String, usize>,
}

impl<T> Searcher<T> {
    pub fn new(items: Vec<T>, accessors: Accessors<T>) -> Self {
        let index = InvertedIndex::build(&items, accessors.attributes, accessors.id);
        Self::assemble(items, accessors, index)
    }

    /// [`Searcher::new`] with the index built on the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn new_parallel(items: Vec<T>, accessors: Accessors<T>) -> Self
    where
        T: Sync,
    {
        let index = InvertedIndex::build_parallel(&items, accessors.attributes, accessors.id);
        Self::assemble(items, accessors, index)
    }

    fn assemble(items: Vec<T>, accessors: Accessors<T>, index: InvertedIndex) -> Self {
        let positions: HashMap<String, usize> = items
            .iter()
            .enumerate()
            .map(|(position, item)| ((accessors.id)(item).to_string(), position))
            .collect();
        debug_assert_eq!(
            index.check_owners(|id| positions.contains_key(id)),
            Ok(()),
            "inverted index refers to unknown entity"
        );
        Self {
            items,
            accessors,
            index,
            positions,
        }
    }

    /// Swap in a new dataset. The old index is discarded, not patched.
    pub fn reload(&mut self, items: Vec<T>) {
        *self = Self::new(items, self.accessors);
    }

    pub fn search(&self, filters: &SearchFilters) -> SearchOutcome<'_, T> {
        search(&self.items, &self.accessors, &self.index, filters)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn accessors(&self) -> &Accessors<T> {
        &self.accessors
    }

    /// Look an entity up by id.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.positions.get(id).map(|&position| &self.items[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchSpan, Role, FIELD_PERMISSIONS};

    fn roles() -> Vec<Role> {
        vec![
            Role::new("a.viewer", "A Viewer", vec!["a.get".into(), "a.list".into()]),
            Role::new("b.admin", "B Admin", vec!["b.get".into(), "b.delete".into()]),
        ]
    }

    fn ids(outcome: &SearchOutcome<'_, Role>) -> Vec<String> {
        outcome.results.iter().map(|r| r.item.id.clone()).collect()
    }

    #[test]
    fn test_no_filters_returns_everything_unannotated() {
        let searcher = Searcher::new(roles(), Role::accessors());
        let outcome = searcher.search(&SearchFilters::new().with_id("").with_name(""));
        assert!(!outcome.is_filtered);
        assert_eq!(ids(&outcome), vec!["a.viewer", "b.admin"]);
        assert!(outcome.results.iter().all(|r| r.matches.is_empty()));
    }

    #[test]
    fn test_permission_filter_attaches_one_match_per_permission() {
        let searcher = Searcher::new(roles(), Role::accessors());
        let outcome = searcher.search(&SearchFilters::new().with_attribute("get"));
        assert!(outcome.is_filtered);
        assert_eq!(ids(&outcome), vec!["a.viewer", "b.admin"]);
        for result in &outcome.results {
            assert_eq!(result.matches.len(), 1);
            assert_eq!(result.matches[0].key, FIELD_PERMISSIONS);
            assert_eq!(result.matches[0].spans, vec![MatchSpan::new(2, 4)]);
        }
    }

    #[test]
    fn test_id_filter_records_span() {
        let searcher = Searcher::new(roles(), Role::accessors());
        let outcome = searcher.search(&SearchFilters::new().with_id("a."));
        assert_eq!(ids(&outcome), vec!["a.viewer"]);
        let m = outcome.results[0].first_match(FIELD_ID).unwrap();
        assert_eq!(m.spans, vec![MatchSpan::new(0, 1)]);
        assert_eq!(outcome.results[0].original_index, 0);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let searcher = Searcher::new(roles(), Role::accessors());
        let outcome = searcher.search(&SearchFilters::new().with_name("admin").with_attribute("a."));
        assert!(outcome.is_empty());

        let outcome = searcher.search(&SearchFilters::new().with_name("admin").with_attribute("delete"));
        assert_eq!(ids(&outcome), vec!["b.admin"]);
        let keys: Vec<&str> = outcome.results[0].matches.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "permissions"]);
    }

    #[test]
    fn test_preview_caps_but_counts_everything() {
        let permissions: Vec<String> = (0..13).map(|i| format!("svc.thing{}.get", i)).collect();
        let searcher = Searcher::new(
            vec![Role::new("svc.admin", "Admin", permissions)],
            Role::accessors(),
        );
        let outcome = searcher.search(&SearchFilters::new().with_id("svc").with_attribute("get"));
        let preview = outcome.preview(0, 10).unwrap();
        assert_eq!(preview.shown.len(), 10);
        assert_eq!(preview.total, 13);
        assert_eq!(preview.hidden(), 3);
        assert!(preview.shown.iter().all(|m| m.key == FIELD_PERMISSIONS));
    }

    #[test]
    fn test_reload_rebuilds_index() {
        let mut searcher = Searcher::new(roles(), Role::accessors());
        searcher.reload(vec![Role::new("c.owner", "C Owner", vec!["c.setIamPolicy".into()])]);
        assert!(searcher.get("a.viewer").is_none());
        assert!(searcher.index().lookup_exact("a.get").is_none());
        let outcome = searcher.search(&SearchFilters::new().with_attribute("iam"));
        assert_eq!(ids(&outcome), vec!["c.owner"]);
    }
}
