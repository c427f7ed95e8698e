use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

// Kind of PII carried by a detection, span or artifact
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Person,
    Email,
    Phone,
    Id,
}

impl EntityType {
    /// Pattern rules in their fixed evaluation order.
    pub const PATTERNS: [EntityType; 3] = [EntityType::Email, EntityType::Phone, EntityType::Id];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "PERSON",
            EntityType::Email => "EMAIL",
            EntityType::Phone => "PHONE",
            EntityType::Id => "ID",
        }
    }

    pub fn is_pattern(&self) -> bool {
        !matches!(self, EntityType::Person)
    }

    pub fn try_from_str(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_uppercase().as_str() {
            "PERSON" => Ok(EntityType::Person),
            "EMAIL" => Ok(EntityType::Email),
            "PHONE" => Ok(EntityType::Phone),
            "ID" => Ok(EntityType::Id),
            _ => Err(ConfigError::InvalidEntityType(s.to_string())),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw match in transliterated-text coordinates (`end` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub entity_type: EntityType,
    pub trans_start: usize,
    pub trans_end: usize,
}

impl Detection {
    pub fn new(entity_type: EntityType, trans_start: usize, trans_end: usize) -> Self {
        Self {
            entity_type,
            trans_start,
            trans_end,
        }
    }
}

/// A match in original-text character coordinates (`end` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub entity_type: EntityType,
    pub start: usize,
    pub end: usize,
}

/// Single PII replacement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Exact substring of the normalized input.
    pub original: String,
    /// Placeholder written into the anonymized text, e.g. `PERSON_1`.
    pub replacement: String,
}

/// Output of one `Anonymizer::anonymize` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizationResult {
    pub anonymized_text: String,
    /// Ordered left to right as the placeholders appear in `anonymized_text`.
    pub artifacts: Vec<Artifact>,
    /// `transliteration_mapping[j]` is the char index in the normalized input
    /// that produced transliterated char `j`.
    pub transliteration_mapping: Vec<usize>,
}
