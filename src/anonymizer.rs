//! Deterministic dictionary + pattern anonymizer.
//!
//! Flow: NFC normalization, transliteration to ASCII lowercase with a
//! position map, detection on the transliterated text, projection of matches
//! back onto the original text, overlap merge, and placeholder rewrite.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::AnonymizerConfig;
use crate::detect::{detect, dictionary_tokens, PatternSet};
use crate::error::{AnonymizationError, BoxError};
use crate::mapping::transliterate_with_mapping;
use crate::models::AnonymizationResult;
use crate::normalize::normalize;
use crate::replace::rewrite;
use crate::spans::map_and_merge;
use crate::transliterate::{BuiltinTransliterator, Transliterate};

/// Cheap to clone; clones share the transliterator.
#[derive(Clone)]
pub struct Anonymizer {
    transliterator: Arc<dyn Transliterate>,
    patterns: PatternSet,
}

impl Anonymizer {
    pub fn new() -> Self {
        Self::with_transliterator(BuiltinTransliterator)
    }

    pub fn with_transliterator(transliterator: impl Transliterate + 'static) -> Self {
        Self {
            transliterator: Arc::new(transliterator),
            patterns: PatternSet::all(),
        }
    }

    pub fn from_config(config: &AnonymizerConfig) -> Self {
        Self::new().with_patterns(PatternSet::from_types(&config.patterns))
    }

    pub fn with_patterns(mut self, patterns: PatternSet) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn transliterator(&self) -> &dyn Transliterate {
        self.transliterator.as_ref()
    }

    /// Replace PII in `text` with `TYPE_n` placeholders.
    ///
    /// `sensitive_words` are raw words in any script; an empty slice disables
    /// dictionary matching only.
    pub fn anonymize<S: AsRef<str>>(
        &self,
        text: &str,
        sensitive_words: &[S],
    ) -> Result<AnonymizationResult, AnonymizationError> {
        self.run(text, sensitive_words).map_err(AnonymizationError::wrap)
    }

    fn run<S: AsRef<str>>(
        &self,
        text: &str,
        sensitive_words: &[S],
    ) -> Result<AnonymizationResult, BoxError> {
        if text.is_empty() {
            return Ok(AnonymizationResult::default());
        }

        let normalized = normalize(text);
        let transliterated = transliterate_with_mapping(self.transliterator(), &normalized)?;
        debug!(
            "Transliterated {} chars → {} chars",
            normalized.chars().count(),
            transliterated.mapping.len()
        );

        let tokens = dictionary_tokens(self.transliterator(), sensitive_words)?;
        let detections = detect(&transliterated.text, &tokens, &self.patterns);

        if detections.is_empty() {
            return Ok(AnonymizationResult {
                anonymized_text: normalized,
                artifacts: Vec::new(),
                transliteration_mapping: transliterated.mapping,
            });
        }

        let spans = map_and_merge(&detections, &transliterated.mapping);
        let (anonymized_text, artifacts) = rewrite(&normalized, &spans);

        info!("Anonymized: {} PII entities replaced", artifacts.len());
        Ok(AnonymizationResult {
            anonymized_text,
            artifacts,
            transliteration_mapping: transliterated.mapping,
        })
    }
}

impl Default for Anonymizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Anonymizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Anonymizer")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityType;

    const NO_WORDS: &[&str] = &[];

    #[test]
    fn empty_text_short_circuits() {
        let result = Anonymizer::new().anonymize("", &["ivan"]).unwrap();
        assert_eq!(result, AnonymizationResult::default());
    }

    #[test]
    fn text_without_pii_is_returned_normalized() {
        let result = Anonymizer::new().anonymize("Rene\u{0301} sat.", NO_WORDS).unwrap();
        assert_eq!(result.anonymized_text, "Ren\u{00e9} sat.");
        assert!(result.artifacts.is_empty());
        assert_eq!(result.transliteration_mapping.len(), "rene sat.".len());
    }

    #[test]
    fn one_engine_serves_many_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Anonymizer>();

        let anonymizer = Anonymizer::new();
        let texts = ["Пацієнт Іван", "Ivan at ivan@test.com", "Лікар Коваль", "Tel: 0441234567"];
        let results: Vec<AnonymizationResult> = std::thread::scope(|scope| {
            let handles: Vec<_> = texts
                .iter()
                .map(|text| {
                    let anonymizer = &anonymizer;
                    scope.spawn(move || anonymizer.anonymize(text, &["ivan", "Коваль"]).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (text, concurrent) in texts.iter().zip(&results) {
            assert_eq!(concurrent, &anonymizer.anonymize(text, &["ivan", "Коваль"]).unwrap());
        }
        assert_eq!(results[2].anonymized_text, "Лікар PERSON_1");
    }

    #[test]
    fn disabled_patterns_are_not_run() {
        let config = AnonymizerConfig {
            patterns: vec![EntityType::Email],
            max_input_chars: None,
        };
        let result = Anonymizer::from_config(&config)
            .anonymize("Passport 12345678, mail a@b.com", NO_WORDS)
            .unwrap();
        assert_eq!(result.anonymized_text, "Passport 12345678, mail EMAIL_1");
    }
}
