// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Field search: the match primitive applied across a collection.
//!
//! A stable filter, never a re-sort. An empty query is the identity filter:
//! every item passes through with no match attached, which is what the
//! listing shows before the user types anything.

use super::matcher::Needle;
use crate::types::FieldMatch;

/// An item that passed a single-valued field filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHit<'a, T> {
    /// Position of `item` in the searched collection.
    pub index: usize,
    pub item: &'a T,
    /// `None` when the query was empty.
    pub matched: Option<FieldMatch>,
}

/// An item that passed a multi-valued field filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiFieldHit<'a, T> {
    pub index: usize,
    pub item: &'a T,
    /// One entry per matching candidate value, in the item's own order.
    /// Empty when the query was empty.
    pub matches: Vec<FieldMatch>,
}

/// Filter `items` by a case-insensitive substring of one field.
///
/// # Example
///
/// ```
/// use iamlens::search_field;
///
/// let names = vec!["Storage Admin".to_string(), "Viewer".to_string()];
/// let hits = search_field(&names, |n: &String| n.as_str(), "admin", "name");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].index, 0);
/// ```
pub fn search_field<'a, T, F>(
    items: &'a [T],
    accessor: F,
    query: &str,
    field_key: &str,
) -> Vec<FieldHit<'a, T>>
where
    F: Fn(&T) -> &str,
{
    search_field_indexed(items.iter().enumerate(), accessor, query, field_key)
}

/// [`search_field`] over an already-narrowed working set of `(index, item)`.
pub fn search_field_indexed<'a, T, I, F>(
    items: I,
    accessor: F,
    query: &str,
    field_key: &str,
) -> Vec<FieldHit<'a, T>>
where
    T: 'a,
    I: IntoIterator<Item = (usize, &'a T)>,
    F: Fn(&T) -> &str,
{
    let Some(needle) = Needle::new(query) else {
        return items
            .into_iter()
            .map(|(index, item)| FieldHit {
                index,
                item,
                matched: None,
            })
            .collect();
    };

    items
        .into_iter()
        .filter_map(|(index, item)| {
            let value = accessor(item);
            needle.find_in(value).map(|span| FieldHit {
                index,
                item,
                matched: Some(FieldMatch::single(field_key, value, span)),
            })
        })
        .collect()
}

/// Filter `items` by a multi-valued field: kept if any candidate matches.
///
/// Every matching candidate contributes its own [`FieldMatch`], not just the
/// first one.
pub fn search_multi_field<'a, T, F>(
    items: &'a [T],
    accessor: F,
    query: &str,
    field_key: &str,
) -> Vec<MultiFieldHit<'a, T>>
where
    F: Fn(&T) -> &[String],
{
    let Some(needle) = Needle::new(query) else {
        return items
            .iter()
            .enumerate()
            .map(|(index, item)| MultiFieldHit {
                index,
                item,
                matches: Vec::new(),
            })
            .collect();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let matches = match_candidates(&needle, accessor(item), field_key);
            (!matches.is_empty()).then_some(MultiFieldHit {
                index,
                item,
                matches,
            })
        })
        .collect()
}

/// One [`FieldMatch`] per candidate the needle occurs in, in candidate order.
pub(crate) fn match_candidates(
    needle: &Needle,
    candidates: &[String],
    field_key: &str,
) -> Vec<FieldMatch> {
    candidates
        .iter()
        .filter_map(|value| {
            needle
                .find_in(value)
                .map(|span| FieldMatch::single(field_key, value.as_str(), span))
        })
        .collect()
}
