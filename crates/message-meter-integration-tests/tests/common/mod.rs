//! Common test utilities for message-meter integration tests
//!
//! This module provides:
//! - A recording registry capturing every write that crosses the series
//!   registry boundary, in order
//! - Helper functions for creating test fixtures

use message_meter_core::GenericMessage;
use meter_runtime::{
    CounterSeries, GaugeSeries, SeriesName, SeriesRegistry, Tags, TimerOptions, TimerSeries,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Install a subscriber so provider warnings surface under RUST_LOG
///
/// Safe to call from every test; only the first call wins.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Recording Registry
// ============================================================================

/// A single write observed at the registry boundary
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum RecordedWrite {
    Timer {
        series: String,
        tags: Tags,
        elapsed: Duration,
    },
    Counter {
        series: String,
        tags: Tags,
        amount: u64,
    },
    Gauge {
        series: String,
        tags: Tags,
        value: f64,
    },
}

impl RecordedWrite {
    #[allow(dead_code)]
    pub fn series(&self) -> &str {
        match self {
            Self::Timer { series, .. } => series,
            Self::Counter { series, .. } => series,
            Self::Gauge { series, .. } => series,
        }
    }
}

/// Registry that logs writes instead of aggregating them
///
/// Useful where a test cares about the exact sequence of recordings a
/// monitor performs, not the aggregated totals the in-memory provider
/// reports.
#[derive(Clone)]
pub struct RecordingRegistry {
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
}

impl RecordingRegistry {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[allow(dead_code)]
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    #[allow(dead_code)]
    pub fn clear(&self) {
        self.writes.lock().unwrap().clear();
    }
}

struct RecordingTimer {
    series: String,
    tags: Tags,
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
}

impl TimerSeries for RecordingTimer {
    fn record(&self, elapsed: Duration) {
        self.writes.lock().unwrap().push(RecordedWrite::Timer {
            series: self.series.clone(),
            tags: self.tags.clone(),
            elapsed,
        });
    }
}

struct RecordingCounter {
    series: String,
    tags: Tags,
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
}

impl CounterSeries for RecordingCounter {
    fn increment(&self) {
        self.increment_by(1);
    }

    fn increment_by(&self, amount: u64) {
        self.writes.lock().unwrap().push(RecordedWrite::Counter {
            series: self.series.clone(),
            tags: self.tags.clone(),
            amount,
        });
    }
}

struct RecordingGauge {
    series: String,
    tags: Tags,
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
}

impl GaugeSeries for RecordingGauge {
    fn set(&self, value: f64) {
        self.writes.lock().unwrap().push(RecordedWrite::Gauge {
            series: self.series.clone(),
            tags: self.tags.clone(),
            value,
        });
    }
}

impl SeriesRegistry for RecordingRegistry {
    fn timer(
        &self,
        name: &SeriesName,
        tags: &Tags,
        _options: &TimerOptions,
    ) -> Arc<dyn TimerSeries> {
        Arc::new(RecordingTimer {
            series: name.as_str().to_string(),
            tags: tags.clone(),
            writes: self.writes.clone(),
        })
    }

    fn counter(&self, name: &SeriesName, tags: &Tags) -> Arc<dyn CounterSeries> {
        Arc::new(RecordingCounter {
            series: name.as_str().to_string(),
            tags: tags.clone(),
            writes: self.writes.clone(),
        })
    }

    fn gauge(&self, name: &SeriesName, tags: &Tags) -> Arc<dyn GaugeSeries> {
        Arc::new(RecordingGauge {
            series: name.as_str().to_string(),
            tags: tags.clone(),
            writes: self.writes.clone(),
        })
    }
}

// ============================================================================
// Test Fixtures
// ============================================================================

#[allow(dead_code)]
pub fn order_placed() -> GenericMessage {
    GenericMessage::new("OrderPlaced")
}

#[allow(dead_code)]
pub fn refund_requested() -> GenericMessage {
    GenericMessage::new("RefundRequested")
}

#[allow(dead_code)]
pub fn tenant_message(tenant: &str) -> GenericMessage {
    GenericMessage::new("OrderPlaced").with_metadata("tenant", tenant)
}
