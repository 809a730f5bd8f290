// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the match primitive and highlighting.
//!
//! Case folding can change character counts (`İ` lowercases to two chars),
//! which is exactly where span bookkeeping goes wrong. Every span must stay
//! inside the original value and highlighting must reproduce it exactly.

#![no_main]

use arbitrary::Arbitrary;
use iamlens::{match_substring, split_segments};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    haystack: String,
    needle: String,
    min_highlight_len: u8,
}

fuzz_target!(|input: Input| {
    let Input {
        haystack,
        needle,
        min_highlight_len,
    } = input;
    let needle: String = needle.chars().take(32).collect();

    // INVARIANT 1: matching never panics
    let span = match_substring(&haystack, &needle);

    // INVARIANT 2: spans are inclusive and inside the value
    if let Some(span) = span {
        assert!(!needle.is_empty());
        assert!(span.start <= span.end);
        assert!(span.end < haystack.chars().count());
    }

    // INVARIANT 3: segments cover the value exactly once
    let spans: Vec<_> = span.into_iter().collect();
    let segments = split_segments(&haystack, &spans, usize::from(min_highlight_len));
    let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(joined, haystack);
});
