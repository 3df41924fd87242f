//! # Meter Runtime
//!
//! Multi-backend metric series runtime for message monitoring, with support
//! for Prometheus and a queryable in-memory implementation.
//!
//! This library provides:
//! - Backend-agnostic series lookup keyed by name and tags
//! - Timer, counter, and gauge series traits
//! - A clock abstraction for deterministic latency measurement
//! - Best-effort semantics: backend rejections are logged and absorbed
//!
//! ## Module Organization
//!
//! - [`error`] - Error types for all meter operations
//! - [`series`] - Series names, tags, and timer options
//! - [`clock`] - Clock abstraction and timestamps
//! - [`registry`] - Registry traits and factory
//! - [`provider`] - Backend types and configuration
//! - [`providers`] - Concrete backend implementations

// Module declarations
pub mod clock;
pub mod error;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod series;

// Re-export commonly used types at crate root for convenience
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use error::{ConfigurationError, MeterError, ValidationError};
pub use provider::{BackendConfig, BackendType, InMemoryConfig, PrometheusConfig};
pub use providers::{
    CounterSnapshot, GaugeSnapshot, InMemoryRegistry, PrometheusRegistry, TimerSnapshot,
};
pub use registry::{
    CounterSeries, GaugeSeries, NoOpCounter, NoOpGauge, NoOpSeriesRegistry, NoOpTimer,
    SeriesRegistry, SeriesRegistryFactory, TimerSeries,
};
pub use series::{SeriesName, Tag, Tags, TimerOptions};
