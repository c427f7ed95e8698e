use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::EntityType;

pub const PATTERNS_VAR: &str = "ANONYMIZER_PATTERNS";
pub const MAX_INPUT_CHARS_VAR: &str = "ANONYMIZER_MAX_INPUT_CHARS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnonymizerConfig {
    /// Pattern rules to run; evaluation order is fixed regardless of listing.
    pub patterns: Vec<EntityType>,
    /// Largest accepted input on the HTTP surface, in characters.
    pub max_input_chars: Option<usize>,
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            patterns: EntityType::PATTERNS.to_vec(),
            max_input_chars: None,
        }
    }
}

impl AnonymizerConfig {
    /// Build a config from string-valued settings, e.g. worker env bindings.
    /// Missing or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(PATTERNS_VAR).filter(|v| !v.trim().is_empty()) {
            config.patterns = parse_patterns(&raw)?;
        }

        if let Some(raw) = lookup(MAX_INPUT_CHARS_VAR).filter(|v| !v.trim().is_empty()) {
            let limit = raw.trim().parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                key: MAX_INPUT_CHARS_VAR,
                value: raw.clone(),
            })?;
            config.max_input_chars = Some(limit);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.patterns.iter().find(|t| !t.is_pattern()) {
            Some(t) => Err(ConfigError::NotAPattern(t.to_string())),
            None => Ok(()),
        }
    }
}

fn parse_patterns(raw: &str) -> Result<Vec<EntityType>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(EntityType::try_from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_enable_every_pattern() {
        let config = AnonymizerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AnonymizerConfig::default());
        assert_eq!(config.patterns, EntityType::PATTERNS.to_vec());
    }

    #[test]
    fn reads_patterns_and_limit() {
        let config = AnonymizerConfig::from_lookup(lookup(&[
            (PATTERNS_VAR, "id, email"),
            (MAX_INPUT_CHARS_VAR, "5000"),
        ]))
        .unwrap();
        assert_eq!(config.patterns, vec![EntityType::Id, EntityType::Email]);
        assert_eq!(config.max_input_chars, Some(5000));
    }

    #[test]
    fn rejects_person_and_unknown_names() {
        let err = AnonymizerConfig::from_lookup(lookup(&[(PATTERNS_VAR, "email,person")])).unwrap_err();
        assert!(matches!(err, ConfigError::NotAPattern(_)));

        let err = AnonymizerConfig::from_lookup(lookup(&[(PATTERNS_VAR, "ssn")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEntityType(_)));
    }

    #[test]
    fn rejects_bad_limit() {
        let err =
            AnonymizerConfig::from_lookup(lookup(&[(MAX_INPUT_CHARS_VAR, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: AnonymizerConfig = serde_json::from_str(r#"{"patterns": ["PHONE"]}"#).unwrap();
        assert_eq!(config.patterns, vec![EntityType::Phone]);
        assert_eq!(config.max_input_chars, None);
    }
}
