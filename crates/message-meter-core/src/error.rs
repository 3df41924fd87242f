//! Error types for monitor construction and ingestion.

use thiserror::Error;

/// Errors surfaced by monitor operations
///
/// Construction problems and tag-extraction problems are kept apart so
/// callers can tell a misassembled monitor from a message the configured
/// extractor cannot handle.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Monitor was assembled with missing or invalid configuration
    #[error("Monitor configuration error: {0}")]
    Configuration(#[from] MonitorConfigError),

    /// Configured tag extractor rejected a message during ingestion
    #[error("Tag extraction error: {0}")]
    TagExtraction(#[from] TagExtractionError),
}

impl MonitorError {
    /// Check if this error was caused by monitor configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Monitor configuration errors
///
/// Raised by the builder call that received the bad value, not deferred
/// to `build()`, so the offending call site appears in the error.
#[derive(Debug, Error)]
pub enum MonitorConfigError {
    /// A required builder field was never provided
    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    /// A builder field was provided with an unusable value
    #[error("Invalid configuration for '{field}': {message}")]
    Invalid { field: String, message: String },
}

/// Tag extraction failures
///
/// An extractor failure is a configuration defect; monitors propagate it
/// out of the ingestion call instead of recording under guessed tags.
#[derive(Debug, Error)]
pub enum TagExtractionError {
    /// Message does not carry the metadata key the extractor reads
    #[error("Metadata key '{key}' not present on message")]
    MissingMetadata { key: String },

    /// Extractor-specific failure
    #[error("Tag extraction failed: {message}")]
    Failed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
