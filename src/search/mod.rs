// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search: from a single substring match up to the multi-field searcher.
//!
//! Layered bottom-up. `matcher` finds one span, `field` filters a collection
//! by one field, `composite` chains the field filters with the inverted index,
//! and `highlight` turns the recorded spans back into renderable text.

pub mod composite;
pub mod field;
pub mod highlight;
pub mod matcher;

pub use composite::{
    attribute_preview, search, AttributePreview, SearchFilters, SearchOutcome, Searcher,
};
pub use field::{search_field, search_field_indexed, search_multi_field, FieldHit, MultiFieldHit};
pub use highlight::{field_segments, matched_lines, split_segments, Segment};
pub use matcher::{fold, match_substring, Needle};
