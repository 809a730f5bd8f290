// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The match primitive: case-insensitive substring search with a span.
//!
//! Both sides are folded with `char::to_lowercase`, no locale rules. A few
//! characters lowercase to more than one char (`İ` → `i̇`), so the folded
//! haystack keeps a map back to original character positions. Spans are
//! always reported against the original value.
//!
//! IAM identifiers are overwhelmingly ASCII, so there is a byte-level fast
//! path that skips the folding allocation entirely.

use crate::types::MatchSpan;

/// A query folded once and reusable against many haystacks.
///
/// The index lookup runs one needle against thousands of keys; folding the
/// needle per key would dominate.
#[derive(Debug, Clone)]
pub struct Needle {
    folded: Vec<char>,
    ascii: Option<Vec<u8>>,
}

impl Needle {
    /// Fold `query`. Returns `None` for the empty query, which matches nothing.
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        let folded: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
        let ascii = query
            .is_ascii()
            .then(|| query.bytes().map(|b| b.to_ascii_lowercase()).collect());
        Some(Self { folded, ascii })
    }

    /// Length of the folded needle in characters.
    pub fn len(&self) -> usize {
        self.folded.len()
    }

    /// Never true: empty queries do not produce a needle.
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// First occurrence of the needle in `haystack`.
    pub fn find_in(&self, haystack: &str) -> Option<MatchSpan> {
        if haystack.is_empty() {
            return None;
        }
        match &self.ascii {
            Some(needle) if haystack.is_ascii() => find_ascii(haystack.as_bytes(), needle),
            _ => self.find_folded(haystack),
        }
    }

    /// True if the needle occurs anywhere in `haystack`.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.find_in(haystack).is_some()
    }

    fn find_folded(&self, haystack: &str) -> Option<MatchSpan> {
        // origin[i] = character index in `haystack` that produced folded[i]
        let mut folded = Vec::with_capacity(haystack.len());
        let mut origin = Vec::with_capacity(haystack.len());
        for (index, c) in haystack.chars().enumerate() {
            for lower in c.to_lowercase() {
                folded.push(lower);
                origin.push(index);
            }
        }

        let n = self.folded.len();
        if n > folded.len() {
            return None;
        }
        let position = folded.windows(n).position(|w| w == self.folded.as_slice())?;
        Some(MatchSpan::new(origin[position], origin[position + n - 1]))
    }
}

fn find_ascii(haystack: &[u8], needle: &[u8]) -> Option<MatchSpan> {
    let n = needle.len();
    if n > haystack.len() {
        return None;
    }
    let start = haystack
        .windows(n)
        .position(|w| w.iter().zip(needle).all(|(h, q)| h.to_ascii_lowercase() == *q))?;
    Some(MatchSpan::new(start, start + n - 1))
}

/// Case-insensitive substring match returning the first occurrence.
///
/// An empty needle or an empty haystack never matches. The span is inclusive:
/// for length-preserving folds `end = start + needle.chars().count() - 1`.
pub fn match_substring(haystack: &str, needle: &str) -> Option<MatchSpan> {
    Needle::new(needle)?.find_in(haystack)
}

/// Fold a value the same way [`Needle`] folds queries.
pub fn fold(value: &str) -> String {
    value.chars().flat_map(char::to_lowercase).collect()
}
