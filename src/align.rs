use similar::{capture_diff_slices, Algorithm, DiffTag};
use std::hash::Hash;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// One run of an edit script between `left` and `right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRun {
    pub kind: RunKind,
    pub left: Range<usize>,
    pub right: Range<usize>,
}

/// Align two sequences with Myers' O(N·D) diff.
///
/// Runs are contiguous and cover both inputs completely; adjacent
/// delete/insert pairs are reported as a single `Replace`.
pub fn align<T: Eq + Hash + Ord>(left: &[T], right: &[T]) -> Vec<AlignedRun> {
    capture_diff_slices(Algorithm::Myers, left, right)
        .iter()
        .map(|op| {
            let (tag, left, right) = op.as_tag_tuple();
            let kind = match tag {
                DiffTag::Equal => RunKind::Equal,
                DiffTag::Insert => RunKind::Insert,
                DiffTag::Delete => RunKind::Delete,
                DiffTag::Replace => RunKind::Replace,
            };
            AlignedRun { kind, left, right }
        })
        .collect()
}
