//! In-memory metric backend.
//!
//! Thread-safe in-memory implementation for testing and development.
//! Series are queryable, so tests can assert on recorded values without
//! scraping an exporter.

use crate::provider::InMemoryConfig;
use crate::registry::{
    CounterSeries, GaugeSeries, NoOpCounter, NoOpGauge, NoOpTimer, SeriesRegistry, TimerSeries,
};
use crate::series::{SeriesName, Tags, TimerOptions};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::warn;

/// Key identifying one series within the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SeriesKey {
    name: SeriesName,
    tags: Tags,
}

impl SeriesKey {
    fn new(name: &SeriesName, tags: &Tags) -> Self {
        Self {
            name: name.clone(),
            tags: tags.clone(),
        }
    }
}

/// Timer series backed by atomic cells
#[derive(Debug, Default)]
struct InMemoryTimer {
    count: AtomicU64,
    total_nanos: AtomicU64,
    max_nanos: AtomicU64,
}

impl InMemoryTimer {
    fn snapshot(&self, tags: Tags) -> TimerSnapshot {
        TimerSnapshot {
            tags,
            count: self.count.load(Ordering::Relaxed),
            total: Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed)),
            max: Duration::from_nanos(self.max_nanos.load(Ordering::Relaxed)),
        }
    }
}

impl TimerSeries for InMemoryTimer {
    fn record(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);
    }
}

/// Counter series backed by an atomic cell
#[derive(Debug, Default)]
struct InMemoryCounter {
    value: AtomicU64,
}

impl CounterSeries for InMemoryCounter {
    fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    fn increment_by(&self, amount: u64) {
        self.value.fetch_add(amount, Ordering::Relaxed);
    }
}

/// Gauge series storing an f64 as raw bits in an atomic cell
#[derive(Debug, Default)]
struct InMemoryGauge {
    bits: AtomicU64,
}

impl InMemoryGauge {
    fn value(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl GaugeSeries for InMemoryGauge {
    fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Point-in-time view of one timer series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub tags: Tags,
    pub count: u64,
    pub total: Duration,
    pub max: Duration,
}

impl TimerSnapshot {
    /// Mean recorded duration, if anything was recorded
    pub fn mean(&self) -> Option<Duration> {
        if self.count == 0 {
            return None;
        }

        let nanos = self.total.as_nanos() / u128::from(self.count);
        Some(Duration::from_nanos(
            u64::try_from(nanos).unwrap_or(u64::MAX),
        ))
    }
}

/// Point-in-time view of one counter series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub tags: Tags,
    pub count: u64,
}

/// Point-in-time view of one gauge series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeSnapshot {
    pub tags: Tags,
    pub value: f64,
}

#[derive(Default)]
struct SeriesStore {
    timers: HashMap<SeriesKey, Arc<InMemoryTimer>>,
    counters: HashMap<SeriesKey, Arc<InMemoryCounter>>,
    gauges: HashMap<SeriesKey, Arc<InMemoryGauge>>,
}

impl SeriesStore {
    fn total_series(&self) -> usize {
        self.timers.len() + self.counters.len() + self.gauges.len()
    }
}

/// In-memory series registry
///
/// Stores every series in process memory behind a read/write lock. The
/// number of distinct series across all names is capped by
/// [`InMemoryConfig::max_series`]; lookups past the cap are logged and
/// handed a detached series so callers never observe the overflow.
///
/// Timer creation options are accepted for interface parity and ignored;
/// snapshots expose count, total, and maximum instead of histogram buckets.
pub struct InMemoryRegistry {
    config: InMemoryConfig,
    store: RwLock<SeriesStore>,
}

impl InMemoryRegistry {
    /// Create new in-memory registry with configuration
    pub fn new(config: InMemoryConfig) -> Self {
        Self {
            config,
            store: RwLock::new(SeriesStore::default()),
        }
    }

    /// Number of distinct series currently held
    pub fn series_count(&self) -> usize {
        self.store.read().unwrap().total_series()
    }

    /// Snapshot a timer series
    pub fn timer_snapshot(&self, name: &SeriesName, tags: &Tags) -> Option<TimerSnapshot> {
        let store = self.store.read().unwrap();
        store
            .timers
            .get(&SeriesKey::new(name, tags))
            .map(|timer| timer.snapshot(tags.clone()))
    }

    /// Current value of a counter series
    pub fn counter_value(&self, name: &SeriesName, tags: &Tags) -> Option<u64> {
        let store = self.store.read().unwrap();
        store
            .counters
            .get(&SeriesKey::new(name, tags))
            .map(|counter| counter.value.load(Ordering::Relaxed))
    }

    /// Current value of a gauge series
    pub fn gauge_value(&self, name: &SeriesName, tags: &Tags) -> Option<f64> {
        let store = self.store.read().unwrap();
        store
            .gauges
            .get(&SeriesKey::new(name, tags))
            .map(|gauge| gauge.value())
    }

    /// Snapshot every timer series recorded under a name, one entry per
    /// tag set, ordered by tags
    pub fn find_timers(&self, name: &SeriesName) -> Vec<TimerSnapshot> {
        let store = self.store.read().unwrap();
        let mut snapshots: Vec<TimerSnapshot> = store
            .timers
            .iter()
            .filter(|(key, _)| key.name == *name)
            .map(|(key, timer)| timer.snapshot(key.tags.clone()))
            .collect();
        snapshots.sort_by(|a, b| a.tags.cmp(&b.tags));
        snapshots
    }

    /// Snapshot every counter series recorded under a name
    pub fn find_counters(&self, name: &SeriesName) -> Vec<CounterSnapshot> {
        let store = self.store.read().unwrap();
        let mut snapshots: Vec<CounterSnapshot> = store
            .counters
            .iter()
            .filter(|(key, _)| key.name == *name)
            .map(|(key, counter)| CounterSnapshot {
                tags: key.tags.clone(),
                count: counter.value.load(Ordering::Relaxed),
            })
            .collect();
        snapshots.sort_by(|a, b| a.tags.cmp(&b.tags));
        snapshots
    }

    /// Snapshot every gauge series recorded under a name
    pub fn find_gauges(&self, name: &SeriesName) -> Vec<GaugeSnapshot> {
        let store = self.store.read().unwrap();
        let mut snapshots: Vec<GaugeSnapshot> = store
            .gauges
            .iter()
            .filter(|(key, _)| key.name == *name)
            .map(|(key, gauge)| GaugeSnapshot {
                tags: key.tags.clone(),
                value: gauge.value(),
            })
            .collect();
        snapshots.sort_by(|a, b| a.tags.cmp(&b.tags));
        snapshots
    }

    /// Every distinct series name currently held, across all meter
    /// kinds, sorted
    pub fn series_names(&self) -> Vec<SeriesName> {
        let store = self.store.read().unwrap();
        let mut names: Vec<SeriesName> = store
            .timers
            .keys()
            .chain(store.counters.keys())
            .chain(store.gauges.keys())
            .map(|key| key.name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new(InMemoryConfig::default())
    }
}

impl SeriesRegistry for InMemoryRegistry {
    fn timer(
        &self,
        name: &SeriesName,
        tags: &Tags,
        _options: &TimerOptions,
    ) -> Arc<dyn TimerSeries> {
        let key = SeriesKey::new(name, tags);

        {
            let store = self.store.read().unwrap();
            if let Some(timer) = store.timers.get(&key) {
                return timer.clone();
            }
        } // Lock released here

        let mut store = self.store.write().unwrap();
        if let Some(timer) = store.timers.get(&key) {
            return timer.clone();
        }

        if store.total_series() >= self.config.max_series {
            warn!(
                series = %name,
                tags = %tags,
                max_series = self.config.max_series,
                "Series cap reached, returning detached timer"
            );
            return Arc::new(NoOpTimer);
        }

        let timer = Arc::new(InMemoryTimer::default());
        store.timers.insert(key, timer.clone());
        timer
    }

    fn counter(&self, name: &SeriesName, tags: &Tags) -> Arc<dyn CounterSeries> {
        let key = SeriesKey::new(name, tags);

        {
            let store = self.store.read().unwrap();
            if let Some(counter) = store.counters.get(&key) {
                return counter.clone();
            }
        } // Lock released here

        let mut store = self.store.write().unwrap();
        if let Some(counter) = store.counters.get(&key) {
            return counter.clone();
        }

        if store.total_series() >= self.config.max_series {
            warn!(
                series = %name,
                tags = %tags,
                max_series = self.config.max_series,
                "Series cap reached, returning detached counter"
            );
            return Arc::new(NoOpCounter);
        }

        let counter = Arc::new(InMemoryCounter::default());
        store.counters.insert(key, counter.clone());
        counter
    }

    fn gauge(&self, name: &SeriesName, tags: &Tags) -> Arc<dyn GaugeSeries> {
        let key = SeriesKey::new(name, tags);

        {
            let store = self.store.read().unwrap();
            if let Some(gauge) = store.gauges.get(&key) {
                return gauge.clone();
            }
        } // Lock released here

        let mut store = self.store.write().unwrap();
        if let Some(gauge) = store.gauges.get(&key) {
            return gauge.clone();
        }

        if store.total_series() >= self.config.max_series {
            warn!(
                series = %name,
                tags = %tags,
                max_series = self.config.max_series,
                "Series cap reached, returning detached gauge"
            );
            return Arc::new(NoOpGauge);
        }

        let gauge = Arc::new(InMemoryGauge::default());
        store.gauges.insert(key, gauge.clone());
        gauge
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
