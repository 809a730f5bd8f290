// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a search result.
//!
//! Match spans, per-field matches and the result wrapper that carries them,
//! plus the three catalog records the engine is normally pointed at: GCP
//! predefined roles, AWS managed policies and AWS actions.
//!
//! # Invariants
//!
//! - **MatchSpan**: `start <= end < value.chars().count()`. Offsets are
//!   character offsets (Unicode scalar values), never bytes, and `end` is
//!   inclusive.
//!
//! - **FieldMatch**: spans are sorted by `start` and never overlap. Use
//!   [`FieldMatch::new`], which normalizes through [`merge_spans`], rather than
//!   building the struct by hand.
//!
//! - **SearchResult**: `original_index` is the position of `item` in the
//!   collection the search ran over.

use serde::{Deserialize, Serialize};

/// Field key for an entity's identifier.
pub const FIELD_ID: &str = "id";
/// Field key for an entity's display name.
pub const FIELD_NAME: &str = "name";
/// Field key for role permissions.
pub const FIELD_PERMISSIONS: &str = "permissions";
/// Field key for the actions granted by a managed policy.
pub const FIELD_ACTIONS: &str = "actions";

/// Prefix carried by GCP role identifiers in upstream datasets.
pub const ROLE_PREFIX: &str = "roles/";

// =============================================================================
// MATCH TYPES
// =============================================================================

/// An inclusive character range within a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    /// Create a span. `end` is inclusive.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "MatchSpan start {} > end {}", start, end);
        Self { start, end }
    }

    /// Number of characters covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Spans always cover at least one character.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True if the two spans overlap or touch.
    #[inline]
    pub fn touches(&self, other: &MatchSpan) -> bool {
        self.start <= other.end.saturating_add(1) && other.start <= self.end.saturating_add(1)
    }
}

/// Sort spans and merge the ones that overlap or are adjacent.
///
/// The result is strictly increasing in `start` with a gap of at least one
/// character between consecutive spans.
pub fn merge_spans(mut spans: Vec<MatchSpan>) -> Vec<MatchSpan> {
    spans.sort_unstable();
    let mut merged: Vec<MatchSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if last.touches(&span) => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// The spans of one field value that matched a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMatch {
    /// Which field matched (`"id"`, `"name"`, `"permissions"`, ...).
    #[serde(rename = "fieldKey")]
    pub key: String,
    /// The full value the spans index into.
    pub value: String,
    pub spans: Vec<MatchSpan>,
}

impl FieldMatch {
    /// Build a field match, normalizing spans into sorted, disjoint order.
    pub fn new(key: impl Into<String>, value: impl Into<String>, spans: Vec<MatchSpan>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            spans: merge_spans(spans),
        }
    }

    /// Build a field match holding a single span.
    pub fn single(key: impl Into<String>, value: impl Into<String>, span: MatchSpan) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            spans: vec![span],
        }
    }

    /// Fold another match on the same value into this one.
    pub fn absorb(&mut self, other: FieldMatch) {
        debug_assert_eq!(self.value, other.value);
        let mut spans = std::mem::take(&mut self.spans);
        spans.extend(other.spans);
        self.spans = merge_spans(spans);
    }
}

/// One item that survived a search, with everything that matched on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T> {
    pub item: T,
    pub matches: Vec<FieldMatch>,
    pub original_index: usize,
}

impl<T> SearchResult<T> {
    /// Wrap an item with no matches.
    pub fn unmatched(item: T, original_index: usize) -> Self {
        Self {
            item,
            matches: Vec::new(),
            original_index,
        }
    }

    /// All matches recorded under `key`, in recorded order.
    pub fn matches_for<'s>(&'s self, key: &'s str) -> impl Iterator<Item = &'s FieldMatch> + 's {
        self.matches.iter().filter(move |m| m.key == key)
    }

    /// The first match recorded under `key`.
    pub fn first_match(&self, key: &str) -> Option<&FieldMatch> {
        self.matches.iter().find(|m| m.key == key)
    }
}

// =============================================================================
// CATALOG RECORDS
// =============================================================================

/// A GCP predefined role.
///
/// `id` has the `roles/` prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub permissions: Vec<String>,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>, permissions: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            permissions,
        }
    }

    /// The identifier as it appears upstream (`roles/...`).
    pub fn qualified_id(&self) -> String {
        format!("{}{}", ROLE_PREFIX, self.id)
    }
}

/// An AWS managed policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// The dataset key, which is the policy name.
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    /// Sorted, as the listing joins them for display.
    pub effective_action_names: Vec<String>,
}

/// An AWS IAM action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The dataset key, `service:ActionName`.
    pub key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub privilege: Option<String>,
    #[serde(default)]
    pub resource_types: Vec<String>,
}
