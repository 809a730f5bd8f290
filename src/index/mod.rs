// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Inverted index: attribute value → owning entity ids.
//!
//! GCP ships the dataset as permission → roles; the listing needs the reverse
//! question answered fast ("which roles grant anything matching `buckets.get`").
//! The index is built once per dataset load and never patched. A reload throws
//! it away and builds a new one.
//!
//! # INVARIANTS
//!
//! 1. **FOLDED_KEYS**: every key is the case-folded attribute value.
//! 2. **NON_EMPTY**: every key owns at least one id.
//! 3. **OWNERS_PRESENT**: every owner id names an entity of the dataset the
//!    index was built from (see [`InvertedIndex::check_owners`]).
//!
//! Lookup scans the distinct keys with the match primitive. At a few thousand
//! keys that is cheaper than maintaining a suffix structure.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::SearchError;
use crate::search::matcher::{fold, Needle};
use crate::types::MatchSpan;

/// Map from folded attribute value to the ids of entities that carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
    occurrences: usize,
}

impl InvertedIndex {
    /// Build the index in one pass over every attribute occurrence.
    pub fn build<T, A, I>(items: &[T], attributes: A, id_of: I) -> Self
    where
        A: Fn(&T) -> &[String],
        I: Fn(&T) -> &str,
    {
        let mut entries: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut occurrences = 0;
        for item in items {
            let id = id_of(item);
            for value in attributes(item) {
                occurrences += 1;
                entries
                    .entry(fold(value))
                    .or_default()
                    .insert(id.to_string());
            }
        }
        tracing::debug!(
            keys = entries.len(),
            occurrences,
            entities = items.len(),
            "built inverted index"
        );
        Self {
            entries,
            occurrences,
        }
    }

    /// Build the index with a parallel map phase.
    ///
    /// Each entity folds its own attributes; the reduce phase merges the
    /// per-entity pairs into one map. Same result as [`InvertedIndex::build`].
    #[cfg(feature = "parallel")]
    pub fn build_parallel<T, A, I>(items: &[T], attributes: A, id_of: I) -> Self
    where
        T: Sync,
        A: Fn(&T) -> &[String] + Sync,
        I: Fn(&T) -> &str + Sync,
    {
        // MAP PHASE: fold per entity
        let per_item: Vec<(&str, Vec<String>)> = items
            .par_iter()
            .map(|item| (id_of(item), attributes(item).iter().map(|v| fold(v)).collect()))
            .collect();

        // REDUCE PHASE
        let mut entries: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut occurrences = 0;
        for (id, keys) in per_item {
            occurrences += keys.len();
            for key in keys {
                entries.entry(key).or_default().insert(id.to_string());
            }
        }
        Self {
            entries,
            occurrences,
        }
    }

    /// Union of the owners of every key containing `query`.
    ///
    /// The empty query is rejected: "no filter" has to be handled by the
    /// caller, it does not mean "every owner".
    pub fn lookup(&self, query: &str) -> Result<BTreeSet<&str>, SearchError> {
        let needle = Needle::new(query).ok_or(SearchError::InvalidArgument(
            "inverted index lookup requires a non-empty query",
        ))?;
        Ok(self.lookup_needle(&needle))
    }

    /// [`InvertedIndex::lookup`] with a pre-folded needle.
    pub fn lookup_needle(&self, needle: &Needle) -> BTreeSet<&str> {
        self.entries
            .iter()
            .filter(|(key, _)| needle.is_match(key))
            .flat_map(|(_, owners)| owners.iter().map(String::as_str))
            .collect()
    }

    /// Owners of exactly `value`, compared case-insensitively.
    pub fn lookup_exact(&self, value: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(&fold(value))
    }

    /// Keys containing the needle, with the span of the first occurrence.
    pub fn matching_keys<'s>(
        &'s self,
        needle: &'s Needle,
    ) -> impl Iterator<Item = (&'s str, MatchSpan)> + 's {
        self.entries
            .keys()
            .filter_map(move |key| needle.find_in(key).map(|span| (key.as_str(), span)))
    }

    /// Distinct folded keys, ascending.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attribute occurrences seen during the build (duplicates included).
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }

    /// Check OWNERS_PRESENT against the ids of the current dataset.
    ///
    /// Returns the first owner id that is not known.
    pub fn check_owners<'s>(&'s self, is_known: impl Fn(&str) -> bool) -> Result<(), &'s str> {
        for owners in self.entries.values() {
            if let Some(unknown) = owners.iter().find(|id| !is_known(id.as_str())) {
                return Err(unknown.as_str());
            }
        }
        Ok(())
    }
}
