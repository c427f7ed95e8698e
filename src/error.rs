use std::error::Error as StdError;

/// Error type returned by pluggable collaborators such as transliterators.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The single failure kind of the anonymization engine.
///
/// A call either returns a complete result or fails with this error; nothing
/// produced before the failure is usable.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AnonymizationError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl AnonymizationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an arbitrary failure. An error that already is an
    /// `AnonymizationError` is returned as-is.
    pub fn wrap(err: BoxError) -> Self {
        match err.downcast::<AnonymizationError>() {
            Ok(inner) => *inner,
            Err(other) => Self {
                message: format!("Anonymization failed: {}", other),
                source: Some(other),
            },
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// Errors raised while building an `AnonymizerConfig`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),
    #[error("{0} is not a pattern rule")]
    NotAPattern(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
