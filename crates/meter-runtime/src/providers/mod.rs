//! Metric backend implementations.
//!
//! This module contains concrete implementations of the `SeriesRegistry`
//! trait for different metric backends.

pub mod memory;
pub mod prometheus;

pub use memory::{CounterSnapshot, GaugeSnapshot, InMemoryRegistry, TimerSnapshot};
pub use prometheus::PrometheusRegistry;
