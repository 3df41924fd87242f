//! Error types for meter runtime operations.

use thiserror::Error;

/// Comprehensive error type for all meter runtime operations
#[derive(Debug, Error)]
pub enum MeterError {
    #[error("Backend error ({backend}): {message}")]
    Backend { backend: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),
}

impl MeterError {
    /// Check if the error was caused by caller-supplied configuration
    /// rather than a backend fault
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Backend { .. } => false,
            Self::ConfigurationError(_) => true,
            Self::ValidationError(_) => true,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },
}

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("Value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
