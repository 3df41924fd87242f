//! Backend types and configuration.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Enumeration of supported metric backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendType {
    InMemory,
    Prometheus,
}

impl BackendType {
    /// Get backend name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::InMemory => "in-memory",
            Self::Prometheus => "prometheus",
        }
    }

    /// Check if the backend exposes series to an external scraper
    pub fn is_exporting(&self) -> bool {
        match self {
            Self::InMemory => false,
            Self::Prometheus => true,
        }
    }
}

/// Backend-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BackendConfig {
    InMemory(InMemoryConfig),
    Prometheus(PrometheusConfig),
}

impl BackendConfig {
    /// Get the backend type this configuration selects
    pub fn backend_type(&self) -> BackendType {
        match self {
            Self::InMemory(_) => BackendType::InMemory,
            Self::Prometheus(_) => BackendType::Prometheus,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self {
            Self::InMemory(config) => config.validate(),
            Self::Prometheus(config) => config.validate(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::InMemory(InMemoryConfig::default())
    }
}

/// In-memory backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryConfig {
    /// Maximum number of distinct series held across all names; lookups
    /// beyond the cap return detached series
    pub max_series: usize,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self { max_series: 10_000 }
    }
}

impl InMemoryConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_series == 0 {
            return Err(ConfigurationError::Invalid {
                message: "max_series must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Prometheus backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrometheusConfig {
    /// Namespace prepended to every exported series name
    pub namespace: Option<String>,
    /// Histogram bucket upper bounds used by timers that do not carry
    /// their own buckets
    pub default_buckets: Vec<f64>,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            default_buckets: vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0],
        }
    }
}

impl PrometheusConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(namespace) = &self.namespace {
            if namespace.is_empty() {
                return Err(ConfigurationError::Invalid {
                    message: "namespace must not be empty when set".to_string(),
                });
            }
        }

        if self.default_buckets.is_empty() {
            return Err(ConfigurationError::Invalid {
                message: "default_buckets must not be empty".to_string(),
            });
        }

        if !self.default_buckets.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(ConfigurationError::Invalid {
                message: "default_buckets must be strictly ascending".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
