use std::collections::HashMap;

use tracing::warn;

use crate::models::{Artifact, EntityType, Span};

/// Hands out `TYPE_n` placeholders, one per distinct (type, value) pair.
///
/// Counters are per type and start at 1. Values compare trimmed and
/// lowercased, so `Ivan` and `IVAN` share a placeholder.
#[derive(Debug, Default)]
pub struct PlaceholderAssigner {
    counters: HashMap<EntityType, usize>,
    assigned: HashMap<(EntityType, String), String>,
}

impl PlaceholderAssigner {
    pub fn placeholder_for(&mut self, entity_type: EntityType, value: &str) -> &str {
        let key = (entity_type, value.trim().to_lowercase());
        let counters = &mut self.counters;
        self.assigned.entry(key).or_insert_with(|| {
            let count = counters.entry(entity_type).or_insert(0);
            *count += 1;
            format!("{}_{}", entity_type.as_str(), count)
        })
    }
}

/// Replace every span of `original` with its placeholder.
///
/// `spans` must be sorted and non-overlapping, in char offsets. Placeholders
/// are assigned left to right first, then the text is rewritten right to left
/// so earlier byte offsets stay valid.
pub fn rewrite(original: &str, spans: &[Span]) -> (String, Vec<Artifact>) {
    let offsets: Vec<usize> = original
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(original.len()))
        .collect();

    let byte_spans: Vec<(EntityType, usize, usize)> = spans
        .iter()
        .filter_map(|s| match (offsets.get(s.start), offsets.get(s.end)) {
            (Some(&start), Some(&end)) if start < end => Some((s.entity_type, start, end)),
            _ => {
                warn!(start = s.start, end = s.end, "Skipping span outside the text");
                None
            }
        })
        .collect();

    let mut assigner = PlaceholderAssigner::default();
    for &(kind, start, end) in &byte_spans {
        assigner.placeholder_for(kind, &original[start..end]);
    }

    let mut redacted = original.to_string();
    let mut artifacts = Vec::with_capacity(byte_spans.len());

    for &(kind, start, end) in byte_spans.iter().rev() {
        let value = &original[start..end];
        let replacement = assigner.placeholder_for(kind, value).to_string();
        redacted.replace_range(start..end, &replacement);
        artifacts.push(Artifact {
            entity_type: kind,
            original: value.to_string(),
            replacement,
        });
    }
    artifacts.reverse();

    (redacted, artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(entity_type: EntityType, start: usize, end: usize) -> Span {
        Span {
            entity_type,
            start,
            end,
        }
    }

    #[test]
    fn counters_are_independent_per_type() {
        let mut assigner = PlaceholderAssigner::default();
        assert_eq!(assigner.placeholder_for(EntityType::Person, "Ivan"), "PERSON_1");
        assert_eq!(assigner.placeholder_for(EntityType::Email, "a@b.com"), "EMAIL_1");
        assert_eq!(assigner.placeholder_for(EntityType::Person, "Petrov"), "PERSON_2");
        assert_eq!(assigner.placeholder_for(EntityType::Person, " IVAN "), "PERSON_1");
        assert_eq!(assigner.placeholder_for(EntityType::Email, "c@d.com"), "EMAIL_2");
    }

    #[test]
    fn same_value_different_type_gets_own_placeholder() {
        let mut assigner = PlaceholderAssigner::default();
        assert_eq!(assigner.placeholder_for(EntityType::Phone, "12345678"), "PHONE_1");
        assert_eq!(assigner.placeholder_for(EntityType::Id, "12345678"), "ID_1");
    }

    #[test]
    fn rewrites_multibyte_text_by_char_offsets() {
        let text = "Клієнт Іван, Іван";
        let spans = [span(EntityType::Person, 7, 11), span(EntityType::Person, 13, 17)];
        let (redacted, artifacts) = rewrite(text, &spans);

        assert_eq!(redacted, "Клієнт PERSON_1, PERSON_1");
        assert_eq!(artifacts.len(), 2);
        assert!(artifacts.iter().all(|a| a.original == "Іван" && a.replacement == "PERSON_1"));
    }

    #[test]
    fn numbering_follows_text_order() {
        let text = "Petrov met Ivan";
        let spans = [span(EntityType::Person, 0, 6), span(EntityType::Person, 11, 15)];
        let (redacted, artifacts) = rewrite(text, &spans);

        assert_eq!(redacted, "PERSON_1 met PERSON_2");
        assert_eq!(artifacts[0].original, "Petrov");
        assert_eq!(artifacts[1].replacement, "PERSON_2");
    }

    #[test]
    fn out_of_range_spans_are_skipped() {
        let (redacted, artifacts) = rewrite("abc", &[span(EntityType::Id, 2, 9)]);
        assert_eq!(redacted, "abc");
        assert!(artifacts.is_empty());
    }
}
