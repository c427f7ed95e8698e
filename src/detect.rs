use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::error::BoxError;
use crate::models::{Detection, EntityType};
use crate::normalize::normalize;
use crate::transliterate::Transliterate;

// Regex patterns for PII in transliterated text
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w.+-]+@[\w.-]+\.\w{2,}").unwrap());
// The phone number is capture group 1; the surrounding groups stand in for
// non-word lookaround, which the regex crate does not support.
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\W)(\+?\d[\d\s\-().]{5,18}\d)(?:\W|$)").unwrap());
static ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{6,20}\b").unwrap());
static TOKEN_EDGE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^a-z0-9']+|[^a-z0-9']+$").unwrap());

/// Enabled pattern rules, always evaluated in `EntityType::PATTERNS` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    rules: Vec<EntityType>,
}

impl PatternSet {
    pub fn all() -> Self {
        Self {
            rules: EntityType::PATTERNS.to_vec(),
        }
    }

    /// Keeps the pattern types found in `enabled`; `PERSON` is ignored.
    pub fn from_types(enabled: &[EntityType]) -> Self {
        let rules = EntityType::PATTERNS
            .iter()
            .copied()
            .filter(|t| enabled.contains(t))
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[EntityType] {
        &self.rules
    }

    /// Byte-offset matches for every enabled rule, rule by rule.
    pub fn find(&self, text: &str) -> Vec<Detection> {
        let mut detections = Vec::new();
        for rule in &self.rules {
            match rule {
                EntityType::Email => {
                    for m in EMAIL.find_iter(text) {
                        detections.push(Detection::new(EntityType::Email, m.start(), m.end()));
                    }
                }
                EntityType::Phone => {
                    for (start, end) in find_phones(text) {
                        detections.push(Detection::new(EntityType::Phone, start, end));
                    }
                }
                EntityType::Id => {
                    for m in ID.find_iter(text) {
                        detections.push(Detection::new(EntityType::Id, m.start(), m.end()));
                    }
                }
                EntityType::Person => {}
            }
        }
        detections
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::all()
    }
}

fn find_phones(text: &str) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    let mut at = 0;
    while at < text.len() {
        let Some(number) = PHONE.captures_at(text, at).and_then(|caps| caps.get(1)) else {
            break;
        };
        found.push((number.start(), number.end()));
        // trailing boundary char is not consumed, it may lead the next number
        at = number.end();
    }
    found
}

/// Turn caller-supplied words into comparison tokens: NFC, transliterated,
/// lowercased, split on whitespace and trimmed of edge punctuation.
pub fn dictionary_tokens<S: AsRef<str>>(
    transliterator: &dyn Transliterate,
    words: &[S],
) -> Result<BTreeSet<String>, BoxError> {
    let mut tokens = BTreeSet::new();
    for word in words {
        let word = word.as_ref();
        if word.is_empty() {
            continue;
        }
        let lowered = transliterator.transliterate(&normalize(word))?.to_lowercase();
        for token in lowered.split_whitespace() {
            let cleaned = TOKEN_EDGE_PUNCT.replace_all(token, "");
            if !cleaned.is_empty() {
                tokens.insert(cleaned.into_owned());
            }
        }
    }
    Ok(tokens)
}

/// Whole-word occurrences of each token, as byte offsets.
pub fn find_dictionary(text: &str, tokens: &BTreeSet<String>) -> Vec<Detection> {
    let mut detections = Vec::new();
    for token in tokens.iter().filter(|t| !t.is_empty()) {
        let mut from = 0;
        while let Some(rel) = text[from..].find(token.as_str()) {
            let start = from + rel;
            let end = start + token.len();
            let before_ok = text[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
            let after_ok = text[end..].chars().next().map_or(true, |c| !c.is_alphanumeric());

            if before_ok && after_ok {
                detections.push(Detection::new(EntityType::Person, start, end));
                from = end;
            } else {
                from = start + text[start..].chars().next().map_or(1, char::len_utf8);
            }
            if from >= text.len() {
                break;
            }
        }
    }
    detections
}

/// Run both detectors over `text` and return detections in char offsets.
pub fn detect(text: &str, tokens: &BTreeSet<String>, patterns: &PatternSet) -> Vec<Detection> {
    let mut detections = find_dictionary(text, tokens);
    detections.extend(patterns.find(text));

    if !text.is_ascii() {
        let char_at = byte_to_char_index(text);
        for d in &mut detections {
            d.trans_start = char_at[d.trans_start];
            d.trans_end = char_at[d.trans_end];
        }
    }
    detections
}

// Indexed by byte offset, valid at every char boundary and at `text.len()`.
fn byte_to_char_index(text: &str) -> Vec<usize> {
    let mut table = vec![0; text.len() + 1];
    let mut count = 0;
    for (byte, ch) in text.char_indices() {
        for slot in &mut table[byte..byte + ch.len_utf8()] {
            *slot = count;
        }
        count += 1;
    }
    table[text.len()] = count;
    table
}
