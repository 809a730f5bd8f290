//! Rendering search results back into highlighted text.

use crate::common::gcp_searcher;
use iamlens::search::{field_segments, matched_lines};
use iamlens::{split_segments, MatchSpan, SearchFilters, Segment};

fn rendered(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| {
            if s.highlighted {
                format!("[{}]", s.text)
            } else {
                s.text.clone()
            }
        })
        .collect()
}

#[test]
fn test_result_spans_render_back_onto_values() {
    let searcher = gcp_searcher();
    let outcome = searcher.search(&SearchFilters::new().with_name("object").with_attribute("LIST"));
    let result = &outcome.results[0];

    let name = result.first_match("name").unwrap();
    assert_eq!(rendered(&field_segments(name, 1)), "Storage [Object] Viewer");

    let permission = result.first_match("permissions").unwrap();
    assert_eq!(
        rendered(&field_segments(permission, 1)),
        "storage.objects.[list]"
    );
}

#[test]
fn test_segments_use_character_offsets() {
    let segments = split_segments("café crème", &[MatchSpan::new(5, 9)], 1);
    assert_eq!(rendered(&segments), "café [crème]");
}

#[test]
fn test_short_spans_are_not_highlighted() {
    let segments = split_segments("a.get", &[MatchSpan::new(0, 0)], 2);
    assert_eq!(rendered(&segments), "a.get");
    assert_eq!(segments.len(), 2);
}

#[test]
fn test_matched_lines_keep_only_hit_lines() {
    let value = "ec2:DescribeInstances\ns3:GetObject\ns3:ListBucket";
    let segments = split_segments(value, &[MatchSpan::new(25, 27)], 1);
    assert_eq!(rendered(&matched_lines(&segments)), "s3:[Get]Object\n");
}
