// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turn match spans into renderable segments.
//!
//! The renderer wants the whole value back as alternating plain and
//! highlighted runs. Spans are character offsets, so slicing goes through
//! char boundaries rather than byte indices.

use serde::Serialize;

use crate::types::{FieldMatch, MatchSpan};

/// A run of text, highlighted or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
        }
    }
}

/// Split `value` into segments covering it exactly once.
///
/// Spans are applied in `(start, end)` order; a span that starts inside an
/// earlier one is skipped. Spans shorter than `min_highlight_len` characters
/// are emitted but not highlighted. Spans past the end of `value` are clamped.
pub fn split_segments(value: &str, spans: &[MatchSpan], min_highlight_len: usize) -> Vec<Segment> {
    // boundaries[i] = byte offset of char i; boundaries[len] = value.len()
    let boundaries: Vec<usize> = value
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(value.len()))
        .collect();
    let char_len = boundaries.len() - 1;

    let mut ordered: Vec<MatchSpan> = spans.to_vec();
    ordered.sort_unstable();

    let mut segments = Vec::new();
    let mut cursor = 0;
    for span in ordered {
        if span.start < cursor || span.start >= char_len {
            continue;
        }
        let end = span.end.min(char_len - 1) + 1;
        if cursor < span.start {
            segments.push(Segment::plain(&value[boundaries[cursor]..boundaries[span.start]]));
        }
        segments.push(Segment {
            text: value[boundaries[span.start]..boundaries[end]].to_string(),
            highlighted: end - span.start >= min_highlight_len,
        });
        cursor = end;
    }
    if cursor < char_len {
        segments.push(Segment::plain(&value[boundaries[cursor]..]));
    }
    segments
}

/// [`split_segments`] for a recorded field match.
pub fn field_segments(field_match: &FieldMatch, min_highlight_len: usize) -> Vec<Segment> {
    split_segments(&field_match.value, &field_match.spans, min_highlight_len)
}

/// Keep only the lines that contain a highlighted segment.
///
/// Multi-line values (a policy's action list joined by newlines) would
/// otherwise render in full. Each kept line that was newline-terminated is
/// followed by a plain `"\n"` segment.
pub fn matched_lines(segments: &[Segment]) -> Vec<Segment> {
    let mut lines = Vec::new();
    let mut line: Vec<Segment> = Vec::new();
    let mut line_matched = false;

    for segment in segments {
        let mut parts = segment.text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                line.push(Segment {
                    text: part.to_string(),
                    highlighted: segment.highlighted,
                });
                line_matched |= segment.highlighted;
            }
            if parts.peek().is_some() {
                // newline reached
                if line_matched && !line.is_empty() {
                    lines.append(&mut line);
                    lines.push(Segment::plain("\n"));
                }
                line.clear();
                line_matched = false;
            }
        }
    }
    if line_matched && !line.is_empty() {
        lines.append(&mut line);
    }
    lines
}
