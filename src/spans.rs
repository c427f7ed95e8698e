use std::cmp::Reverse;

use crate::models::{Detection, Span};

/// Project a detection onto original-text char offsets through `mapping`.
///
/// Returns `None` when the detection lies outside the mapped range.
pub fn to_original(detection: &Detection, mapping: &[usize]) -> Option<Span> {
    if detection.trans_start >= mapping.len() || detection.trans_end < 1 {
        return None;
    }
    let start = mapping[detection.trans_start];
    let last = (detection.trans_end - 1).min(mapping.len() - 1);
    Some(Span {
        entity_type: detection.entity_type,
        start,
        end: mapping[last] + 1,
    })
}

/// Sort by start (longer first on ties) and fold overlapping spans together.
///
/// The earliest-sorted span keeps its type; whatever it absorbs only extends
/// its end.
pub fn merge_overlapping(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|s| (s.start, Reverse(s.end)));

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if let Some(last) = merged.last_mut() {
            if span.start < last.end {
                last.end = last.end.max(span.end);
                continue;
            }
        }
        merged.push(span);
    }
    merged
}

pub fn map_and_merge(detections: &[Detection], mapping: &[usize]) -> Vec<Span> {
    let raw = detections
        .iter()
        .filter_map(|d| to_original(d, mapping))
        .collect();
    merge_overlapping(raw)
}
