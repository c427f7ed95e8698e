//! Transliteration with a position map back to the source text.
//!
//! The text is transliterated twice: once as a whole (the output detectors see)
//! and once character by character (where every output char's source is
//! known). When the two agree the per-character map is exact. When a
//! context-sensitive rule makes them diverge, the whole-string output is
//! aligned against the per-character output and mapped through it. Positions
//! inside non-equal runs are coarse, but the final map always stays in range
//! and non-decreasing.

use tracing::debug;

use crate::align::{align, RunKind};
use crate::error::BoxError;
use crate::transliterate::Transliterate;

/// Transliterated text plus `mapping[j]` = source char index of output char `j`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transliterated {
    pub text: String,
    pub mapping: Vec<usize>,
}

pub fn transliterate_with_mapping(
    transliterator: &dyn Transliterate,
    text: &str,
) -> Result<Transliterated, BoxError> {
    if text.is_empty() {
        return Ok(Transliterated::default());
    }

    let full = transliterator.transliterate(text)?;
    let (per_char, per_char_map) = transliterate_per_char(transliterator, text)?;

    if full == per_char {
        return Ok(Transliterated {
            text: full,
            mapping: per_char_map,
        });
    }

    let full_chars: Vec<char> = full.chars().collect();
    let per_chars: Vec<char> = per_char.chars().collect();
    let (full_to_per, uncertain) = align_full_to_per_char(&full_chars, &per_chars);
    let uncertain_count = uncertain.iter().filter(|u| **u).count();
    debug!(
        full_len = full_chars.len(),
        per_char_len = per_chars.len(),
        uncertain = uncertain_count,
        "Transliteration is context-sensitive, reconciling outputs"
    );

    let mapping = compose_mapping(&full_to_per, &uncertain, &per_char_map, text.chars().count());
    Ok(Transliterated {
        text: full,
        mapping,
    })
}

fn transliterate_per_char(
    transliterator: &dyn Transliterate,
    text: &str,
) -> Result<(String, Vec<usize>), BoxError> {
    let mut out = String::with_capacity(text.len());
    let mut map = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];

    for (orig_idx, ch) in text.chars().enumerate() {
        let part = transliterator.transliterate(ch.encode_utf8(&mut buf))?;
        map.extend(std::iter::repeat(orig_idx).take(part.chars().count()));
        out.push_str(&part);
    }

    Ok((out, map))
}

/// For every whole-string position, the per-character position it aligns to
/// and whether that alignment is uncertain (inside a non-equal run).
fn align_full_to_per_char(full: &[char], per_char: &[char]) -> (Vec<usize>, Vec<bool>) {
    let mut full_to_per = vec![0; full.len()];
    let mut uncertain = vec![false; full.len()];
    if full.is_empty() {
        return (full_to_per, uncertain);
    }

    let max_per_idx = per_char.len().saturating_sub(1);
    for run in align(full, per_char) {
        if run.kind == RunKind::Equal {
            for (shift, full_idx) in run.left.clone().enumerate() {
                full_to_per[full_idx] = run.right.start + shift;
            }
            continue;
        }

        let fallback = run.right.start.min(max_per_idx);
        for full_idx in run.left {
            full_to_per[full_idx] = fallback;
            uncertain[full_idx] = true;
        }
    }

    (full_to_per, uncertain)
}

fn compose_mapping(
    full_to_per: &[usize],
    uncertain: &[bool],
    per_char_map: &[usize],
    original_len: usize,
) -> Vec<usize> {
    if original_len == 0 || per_char_map.is_empty() {
        return vec![0; full_to_per.len()];
    }

    let max_orig = original_len - 1;
    let max_per = per_char_map.len() - 1;
    let mut mapping: Vec<usize> = Vec::with_capacity(full_to_per.len());
    let mut last_known_good = 0;

    for (full_idx, &per_idx) in full_to_per.iter().enumerate() {
        let mut orig = per_char_map[per_idx.min(max_per)].min(max_orig);
        if uncertain[full_idx] {
            orig = orig.max(last_known_good);
        } else {
            last_known_good = last_known_good.max(orig);
        }
        if let Some(&prev) = mapping.last() {
            orig = orig.max(prev);
        }
        mapping.push(orig);
    }

    mapping
}
