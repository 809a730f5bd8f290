// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Comparison of selected entries across groups.
//!
//! Every selected entry contributes its attributes to its group. The result
//! tells, per attribute, which groups hold it, so the view can show what is
//! common to all groups and what is unique to one.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::SelectionState;
use crate::entity::Accessors;

/// Attribute-to-groups table of a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Selected entry keys that exist in the dataset.
    pub keys: BTreeSet<String>,
    /// Attribute value -> groups whose entries carry it.
    pub items: BTreeMap<String, BTreeSet<usize>>,
}

impl Comparison {
    /// The only group holding `item`, if exactly one does.
    pub fn sole_group(&self, item: &str) -> Option<usize> {
        let groups = self.items.get(item)?;
        match groups.len() {
            1 => groups.iter().next().copied(),
            _ => None,
        }
    }

    /// Attributes held by every one of `groups` groups.
    pub fn common(&self, groups: usize) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(move |(_, g)| g.len() == groups && groups > 0)
            .map(|(item, _)| item.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Build the comparison of `selection`.
///
/// `lookup` resolves an entry key to its entity; keys it does not know, and
/// keys that do not parse, are skipped.
pub fn compare<'a, T: 'a>(
    selection: &SelectionState,
    lookup: impl Fn(&str) -> Option<&'a T>,
    accessors: &Accessors<T>,
) -> Comparison {
    let mut comparison = Comparison::default();
    for key in selection.keys() {
        let Some(entity) = lookup(&key.entry_key) else {
            tracing::debug!(entry = %key.entry_key, "skipping selection of unknown entry");
            continue;
        };
        for item in (accessors.attributes)(entity) {
            comparison
                .items
                .entry(item.clone())
                .or_default()
                .insert(key.group);
        }
        comparison.keys.insert(key.entry_key);
    }
    comparison
}
