//! Metric series registry boundary.
//!
//! This module defines the interface between message monitors and metric
//! storage backends. Monitors look up series through [`SeriesRegistry`];
//! backend implementations (in-memory, Prometheus) own the storage.
//!
//! # Architecture
//!
//! - **Monitor Layer**: Resolves `(name, tags)` pairs to series and writes
//!   observations through the series traits
//! - **Backend Layer** (this crate's providers): Implements the traits over
//!   concrete storage
//! - **Best-Effort Pattern**: Series lookup never fails; backend rejections
//!   are logged and absorbed
//!
//! # Examples
//!
//! ```rust
//! use meter_runtime::registry::{NoOpSeriesRegistry, SeriesRegistry};
//! use meter_runtime::series::{SeriesName, Tags, TimerOptions};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let registry: Arc<dyn SeriesRegistry> = Arc::new(NoOpSeriesRegistry);
//!
//! let name = SeriesName::new("commandBus.allTimer").unwrap();
//! let timer = registry.timer(&name, &Tags::none(), &TimerOptions::default());
//! timer.record(Duration::from_millis(150));
//! ```

use crate::error::MeterError;
use crate::provider::BackendConfig;
use crate::providers::memory::InMemoryRegistry;
use crate::providers::prometheus::PrometheusRegistry;
use crate::series::{SeriesName, Tags, TimerOptions};
use std::sync::Arc;
use std::time::Duration;

/// Timer series recording a distribution of elapsed durations
pub trait TimerSeries: Send + Sync {
    /// Record one elapsed duration
    fn record(&self, elapsed: Duration);
}

/// Counter series accumulating a monotonically increasing count
pub trait CounterSeries: Send + Sync {
    /// Increment the counter by one
    fn increment(&self);

    /// Increment the counter by an arbitrary amount
    fn increment_by(&self, amount: u64);
}

/// Gauge series holding the latest value of a measurement
pub trait GaugeSeries: Send + Sync {
    /// Replace the gauge value
    fn set(&self, value: f64);
}

/// Find-or-create access to named, tagged metric series.
///
/// A series is identified by its name together with its full tag set; two
/// lookups with the same identity return handles onto the same underlying
/// storage, so writes from both are merged. Distinct tag values on the same
/// name are independent series.
///
/// # Thread Safety
///
/// All methods take `&self` to support `Arc<dyn SeriesRegistry>` sharing
/// across threads. Implementations must be thread-safe.
///
/// # Best-Effort Pattern
///
/// Lookup never returns an error. When a backend rejects a series (for
/// example a label set conflict or a cardinality cap), implementations log
/// the rejection and return a detached series that accepts writes without
/// exporting them, so callers on the hot path never observe failures.
pub trait SeriesRegistry: Send + Sync {
    /// Look up or create a timer series.
    ///
    /// `options` are applied only by the call that creates the series;
    /// lookups of an existing series return it unchanged.
    fn timer(&self, name: &SeriesName, tags: &Tags, options: &TimerOptions)
        -> Arc<dyn TimerSeries>;

    /// Look up or create a counter series.
    fn counter(&self, name: &SeriesName, tags: &Tags) -> Arc<dyn CounterSeries>;

    /// Look up or create a gauge series.
    fn gauge(&self, name: &SeriesName, tags: &Tags) -> Arc<dyn GaugeSeries>;
}

// ============================================================================
// No-Op Series
// ============================================================================

/// Timer that accepts observations and discards them
pub struct NoOpTimer;

impl TimerSeries for NoOpTimer {
    fn record(&self, _elapsed: Duration) {}
}

/// Counter that accepts increments and discards them
pub struct NoOpCounter;

impl CounterSeries for NoOpCounter {
    fn increment(&self) {}

    fn increment_by(&self, _amount: u64) {}
}

/// Gauge that accepts values and discards them
pub struct NoOpGauge;

impl GaugeSeries for NoOpGauge {
    fn set(&self, _value: f64) {}
}

/// Registry that hands out discarding series.
///
/// Useful in tests and in deployments that wire monitors without a metrics
/// backend. Backends also hand out the no-op series types when they reject
/// a series, keeping rejection invisible to callers.
pub struct NoOpSeriesRegistry;

impl SeriesRegistry for NoOpSeriesRegistry {
    fn timer(
        &self,
        _name: &SeriesName,
        _tags: &Tags,
        _options: &TimerOptions,
    ) -> Arc<dyn TimerSeries> {
        Arc::new(NoOpTimer)
    }

    fn counter(&self, _name: &SeriesName, _tags: &Tags) -> Arc<dyn CounterSeries> {
        Arc::new(NoOpCounter)
    }

    fn gauge(&self, _name: &SeriesName, _tags: &Tags) -> Arc<dyn GaugeSeries> {
        Arc::new(NoOpGauge)
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Factory for creating series registries from configuration
pub struct SeriesRegistryFactory;

impl SeriesRegistryFactory {
    /// Create series registry from configuration
    pub fn create(config: BackendConfig) -> Result<Arc<dyn SeriesRegistry>, MeterError> {
        config.validate()?;

        let registry: Arc<dyn SeriesRegistry> = match config {
            BackendConfig::InMemory(in_memory_config) => {
                Arc::new(InMemoryRegistry::new(in_memory_config))
            }
            BackendConfig::Prometheus(prometheus_config) => {
                Arc::new(PrometheusRegistry::new(prometheus_config)?)
            }
        };

        Ok(registry)
    }

    /// Create in-memory registry for tests
    pub fn create_test_registry() -> Arc<InMemoryRegistry> {
        Arc::new(InMemoryRegistry::default())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
