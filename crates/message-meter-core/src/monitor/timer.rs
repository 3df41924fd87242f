//! Outcome-partitioned latency timers.
//!
//! [`MessageTimerMonitor`] measures how long message handling takes and
//! splits the measurements by outcome. Every resolution is recorded twice:
//! once into an all-messages series and once into exactly one of the
//! success, failure, or ignored series, so the all-series stays the union
//! of the outcome series.
//!
//! Series names are derived from a configured prefix: `{prefix}.allTimer`,
//! `{prefix}.successTimer`, `{prefix}.failureTimer`, and
//! `{prefix}.ignoredTimer`. The tag extractor further partitions each of
//! the four names per message, so one monitor can publish a whole family
//! of per-dimension series.
//!
//! # Examples
//!
//! ```rust
//! use message_meter_core::message::GenericMessage;
//! use message_meter_core::monitor::{MessageMonitor, MessageTimerMonitor};
//! use meter_runtime::SeriesRegistryFactory;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SeriesRegistryFactory::create_test_registry();
//!
//! let monitor = MessageTimerMonitor::<GenericMessage>::builder()
//!     .meter_name_prefix("commandBus")?
//!     .registry(registry)
//!     .build()?;
//!
//! let handle = monitor.on_message_ingested(&GenericMessage::new("OrderPlaced"))?;
//! handle.report_success();
//! # Ok(())
//! # }
//! ```

use crate::error::{MonitorConfigError, MonitorError};
use crate::monitor::{suffixed, CompletionHandle, MessageMonitor, Outcome, OutcomeKind};
use crate::tags::{FnTagExtractor, NoTags, TagExtractor};
use meter_runtime::{Clock, SeriesName, SeriesRegistry, SystemClock, Tags, TimerOptions};
use std::sync::Arc;
use tracing::debug;

const ALL_TIMER_SUFFIX: &str = "allTimer";
const SUCCESS_TIMER_SUFFIX: &str = "successTimer";
const FAILURE_TIMER_SUFFIX: &str = "failureTimer";
const IGNORED_TIMER_SUFFIX: &str = "ignoredTimer";

/// Monitor recording message handling latency, partitioned by outcome
///
/// Ingestion reads the clock once per batch, so all messages of one call
/// share the same start instant. Resolution reads it again, records the
/// elapsed time into the all-series and the matching outcome series, and
/// returns; both recordings are visible in the registry by then. A
/// failure cause carried by the outcome does not change what is
/// recorded.
pub struct MessageTimerMonitor<M> {
    registry: Arc<dyn SeriesRegistry>,
    clock: Arc<dyn Clock>,
    tag_extractor: Arc<dyn TagExtractor<M>>,
    timer_customization: Arc<dyn Fn(&mut TimerOptions) + Send + Sync>,
    all_name: SeriesName,
    success_name: SeriesName,
    failure_name: SeriesName,
    ignored_name: SeriesName,
}

impl<M> MessageTimerMonitor<M> {
    /// Create a builder for this monitor
    pub fn builder() -> MessageTimerMonitorBuilder<M> {
        MessageTimerMonitorBuilder::new()
    }
}

impl<M> MessageMonitor<M> for MessageTimerMonitor<M> {
    fn on_messages_ingested(&self, messages: &[M]) -> Result<Vec<CompletionHandle>, MonitorError> {
        // One clock read for the whole batch
        let ingested_at = self.clock.now();

        let mut options = TimerOptions::new();
        (self.timer_customization)(&mut options);

        let mut handles = Vec::with_capacity(messages.len());
        for message in messages {
            let tags = self.tag_extractor.extract(message)?;

            let all = self.registry.timer(&self.all_name, &tags, &options);
            let success = self.registry.timer(&self.success_name, &tags, &options);
            let failure = self.registry.timer(&self.failure_name, &tags, &options);
            let ignored = self.registry.timer(&self.ignored_name, &tags, &options);

            let clock = self.clock.clone();
            let started_at = ingested_at.clone();
            handles.push(CompletionHandle::new(move |outcome: Outcome| {
                let elapsed = clock.now().duration_since(&started_at);

                all.record(elapsed);
                match outcome.kind() {
                    OutcomeKind::Success => success.record(elapsed),
                    OutcomeKind::Failure => failure.record(elapsed),
                    OutcomeKind::Ignored => ignored.record(elapsed),
                }
            }));
        }

        Ok(handles)
    }
}

/// Builder for [`MessageTimerMonitor`] instances
///
/// The series name prefix and the registry are required; the clock
/// defaults to the system clock, the tag extractor to [`NoTags`], and the
/// timer customization to the identity. Building borrows the builder, so
/// one builder can produce any number of independent monitors.
pub struct MessageTimerMonitorBuilder<M> {
    meter_name_prefix: Option<SeriesName>,
    registry: Option<Arc<dyn SeriesRegistry>>,
    clock: Arc<dyn Clock>,
    tag_extractor: Arc<dyn TagExtractor<M>>,
    timer_customization: Arc<dyn Fn(&mut TimerOptions) + Send + Sync>,
}

impl<M> MessageTimerMonitorBuilder<M> {
    /// Create a builder with default optional components
    pub fn new() -> Self {
        Self {
            meter_name_prefix: None,
            registry: None,
            clock: Arc::new(SystemClock::new()),
            tag_extractor: Arc::new(NoTags),
            timer_customization: Arc::new(|_| {}),
        }
    }

    /// Set the series name prefix
    ///
    /// Rejected immediately when the prefix is not a valid series name,
    /// so the offending call site appears in the error.
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

    /// Set a hook adjusting the publish-time parameters of newly created
    /// timer series, such as histogram buckets or a description
    pub fn timer_customization(
        mut self,
        customization: impl Fn(&mut TimerOptions) + Send + Sync + 'static,
    ) -> Self {
        self.timer_customization = Arc::new(customization);
        self
    }

    /// Build a monitor from the current configuration
    pub fn build(&self) -> Result<MessageTimerMonitor<M>, MonitorConfigError> {
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

        debug!(prefix = prefix.as_str(), "Building message timer monitor");

        Ok(MessageTimerMonitor {
            all_name: suffixed(prefix, ALL_TIMER_SUFFIX)?,
            success_name: suffixed(prefix, SUCCESS_TIMER_SUFFIX)?,
            failure_name: suffixed(prefix, FAILURE_TIMER_SUFFIX)?,
            ignored_name: suffixed(prefix, IGNORED_TIMER_SUFFIX)?,
            registry,
            clock: self.clock.clone(),
            tag_extractor: self.tag_extractor.clone(),
            timer_customization: self.timer_customization.clone(),
        })
    }
}

impl<M> Default for MessageTimerMonitorBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
