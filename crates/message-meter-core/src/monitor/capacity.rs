//! Busy-ratio saturation gauge.
//!
//! [`CapacityMonitor`] publishes `{prefix}.capacity` per tag set: the sum
//! of message-processing durations observed within a trailing window,
//! divided by the window length. A value of 1.0 reads as one fully busy
//! worker; values above 1.0 mean concurrent processing, values near 0
//! mean idle capacity.
//!
//! The windowed samples are monitor-local state; only the resulting ratio
//! crosses the registry boundary, as a gauge.

use crate::error::{MonitorConfigError, MonitorError};
use crate::monitor::{suffixed, CompletionHandle, MessageMonitor, Outcome};
use crate::tags::{FnTagExtractor, NoTags, TagExtractor};
use meter_runtime::{Clock, SeriesName, SeriesRegistry, SystemClock, Tags, Timestamp};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tracing::debug;

const CAPACITY_SUFFIX: &str = "capacity";
const DEFAULT_WINDOW_SECONDS: i64 = 10;

/// Sliding window of processing durations for one tag set
struct BusyWindow {
    samples: Mutex<VecDeque<(Timestamp, Duration)>>,
}

impl BusyWindow {
    fn new() -> Self {
        Self {
            samples: Mutex::new(VecDeque::new()),
        }
    }

    /// Record one duration and return the busy ratio over the trailing
    /// window ending at `completed_at`
    fn observe(
        &self,
        completed_at: &Timestamp,
        elapsed: Duration,
        window: chrono::Duration,
        window_seconds: f64,
    ) -> f64 {
        let cutoff = Timestamp::from_datetime(completed_at.as_datetime() - window);

        let mut samples = self.samples.lock().unwrap();
        samples.push_back((completed_at.clone(), elapsed));
        while let Some((observed_at, _)) = samples.front() {
            if *observed_at < cutoff {
                samples.pop_front();
            } else {
                break;
            }
        }

        let busy: Duration = samples.iter().map(|(_, duration)| *duration).sum();
        busy.as_secs_f64() / window_seconds
    }
}

/// Monitor publishing how much of a trailing time window was spent
/// processing messages
///
/// Every outcome counts: a failed or ignored message occupied a worker
/// just like a successful one, so all resolutions feed the gauge.
pub struct CapacityMonitor<M> {
    registry: Arc<dyn SeriesRegistry>,
    clock: Arc<dyn Clock>,
    tag_extractor: Arc<dyn TagExtractor<M>>,
    capacity_name: SeriesName,
    window: chrono::Duration,
    window_seconds: f64,
    windows: RwLock<HashMap<Tags, Arc<BusyWindow>>>,
}

impl<M> CapacityMonitor<M> {
    /// Create a builder for this monitor
    pub fn builder() -> CapacityMonitorBuilder<M> {
        CapacityMonitorBuilder::new()
    }

    fn window_for(&self, tags: &Tags) -> Arc<BusyWindow> {
        {
            let windows = self.windows.read().unwrap();
            if let Some(window) = windows.get(tags) {
                return window.clone();
            }
        } // Read lock released before taking the write lock

        let mut windows = self.windows.write().unwrap();
        windows
            .entry(tags.clone())
            .or_insert_with(|| Arc::new(BusyWindow::new()))
            .clone()
    }
}

impl<M> MessageMonitor<M> for CapacityMonitor<M> {
    fn on_messages_ingested(&self, messages: &[M]) -> Result<Vec<CompletionHandle>, MonitorError> {
        // One clock read for the whole batch
        let ingested_at = self.clock.now();

        let mut handles = Vec::with_capacity(messages.len());
        for message in messages {
            let tags = self.tag_extractor.extract(message)?;

            let gauge = self.registry.gauge(&self.capacity_name, &tags);
            let busy_window = self.window_for(&tags);

            let clock = self.clock.clone();
            let started_at = ingested_at.clone();
            let window = self.window;
            let window_seconds = self.window_seconds;
            handles.push(CompletionHandle::new(move |_outcome: Outcome| {
                let completed_at = clock.now();
                let elapsed = completed_at.duration_since(&started_at);
                let ratio = busy_window.observe(&completed_at, elapsed, window, window_seconds);
                gauge.set(ratio);
            }));
        }

        Ok(handles)
    }
}

/// Builder for [`CapacityMonitor`] instances
///
/// The series name prefix and the registry are required; the window
/// defaults to 10 seconds, the clock to the system clock, and the tag
/// extractor to [`NoTags`].
pub struct CapacityMonitorBuilder<M> {
    meter_name_prefix: Option<SeriesName>,
    registry: Option<Arc<dyn SeriesRegistry>>,
    clock: Arc<dyn Clock>,
    tag_extractor: Arc<dyn TagExtractor<M>>,
    window: chrono::Duration,
}

impl<M> CapacityMonitorBuilder<M> {
    /// Create a builder with default optional components
    pub fn new() -> Self {
        Self {
            meter_name_prefix: None,
            registry: None,
            clock: Arc::new(SystemClock::new()),
            tag_extractor: Arc::new(NoTags),
            window: chrono::Duration::seconds(DEFAULT_WINDOW_SECONDS),
        }
    }

    /// Set the series name prefix
    ///
    /// Rejected immediately when the prefix is not a valid series name.
    pub fn meter_name_prefix(
        mut self,
        prefix: impl Into<String>,
    ) -> Result<Self, MonitorConfigError> {
        let prefix = SeriesName::new(prefix).map_err(|error| MonitorConfigError::Invalid {
            field: "meter_name_prefix".to_string(),
            message: error.to_string(),
        })?;
        self.meter_name_prefix = Some(prefix);
        Ok(self)
    }

    /// Set the series registry the monitor records into
    pub fn registry(mut self, registry: Arc<dyn SeriesRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the clock used for start and completion instants
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the tag extractor partitioning series per message
    pub fn tag_extractor(mut self, tag_extractor: impl TagExtractor<M> + 'static) -> Self {
        self.tag_extractor = Arc::new(tag_extractor);
        self
    }

    /// Set the tag extractor from an infallible closure
    pub fn tag_extractor_fn(self, function: impl Fn(&M) -> Tags + Send + Sync + 'static) -> Self {
        self.tag_extractor(FnTagExtractor::new(function))
    }

    /// Set the trailing window length
    ///
    /// Rejected immediately when the window is not positive.
    pub fn window(mut self, window: chrono::Duration) -> Result<Self, MonitorConfigError> {
        if window <= chrono::Duration::zero() {
            return Err(MonitorConfigError::Invalid {
                field: "window".to_string(),
                message: "window must be positive".to_string(),
            });
        }
        self.window = window;
        Ok(self)
    }

    /// Build a monitor from the current configuration
    pub fn build(&self) -> Result<CapacityMonitor<M>, MonitorConfigError> {
        let prefix = self
            .meter_name_prefix
            .as_ref()
            .ok_or_else(|| MonitorConfigError::Missing {
                field: "meter_name_prefix".to_string(),
            })?;
        let registry = self
            .registry
            .clone()
            .ok_or_else(|| MonitorConfigError::Missing {
                field: "registry".to_string(),
            })?;
        let window_seconds = self
            .window
            .to_std()
            .map_err(|error| MonitorConfigError::Invalid {
                field: "window".to_string(),
                message: error.to_string(),
            })?
            .as_secs_f64();

        debug!(
            prefix = prefix.as_str(),
            window_seconds, "Building capacity monitor"
        );

        Ok(CapacityMonitor {
            capacity_name: suffixed(prefix, CAPACITY_SUFFIX)?,
            registry,
            clock: self.clock.clone(),
            tag_extractor: self.tag_extractor.clone(),
            window: self.window,
            window_seconds,
            windows: RwLock::new(HashMap::new()),
        })
    }
}

impl<M> Default for CapacityMonitorBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "capacity_tests.rs"]
mod tests;
