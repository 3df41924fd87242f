//! Outcome-partitioned throughput counters.
//!
//! [`MessageCountingMonitor`] counts messages instead of timing them.
//! Ingestion moves `{prefix}.ingestedCounter` immediately; resolution
//! moves the counters matching the outcome. The ingested count therefore
//! runs ahead of the others while messages are in flight, and the gap
//! between ingested and the outcome counters is the in-flight backlog.

use crate::error::{MonitorConfigError, MonitorError};
use crate::monitor::{suffixed, CompletionHandle, MessageMonitor, Outcome, OutcomeKind};
use crate::tags::{FnTagExtractor, NoTags, TagExtractor};
use meter_runtime::{SeriesName, SeriesRegistry, Tags};
use std::sync::Arc;
use tracing::debug;

const INGESTED_COUNTER_SUFFIX: &str = "ingestedCounter";
const PROCESSED_COUNTER_SUFFIX: &str = "processedCounter";
const SUCCESS_COUNTER_SUFFIX: &str = "successCounter";
const FAILURE_COUNTER_SUFFIX: &str = "failureCounter";
const IGNORED_COUNTER_SUFFIX: &str = "ignoredCounter";

/// Monitor counting messages by ingestion and outcome
///
/// Success moves the success and processed counters, failure moves the
/// failure and processed counters, ignored moves only the ignored
/// counter. An ignored message was never processed, so it stays out of
/// the processed count.
pub struct MessageCountingMonitor<M> {
    registry: Arc<dyn SeriesRegistry>,
    tag_extractor: Arc<dyn TagExtractor<M>>,
    ingested_name: SeriesName,
    processed_name: SeriesName,
    success_name: SeriesName,
    failure_name: SeriesName,
    ignored_name: SeriesName,
}

impl<M> MessageCountingMonitor<M> {
    /// Create a builder for this monitor
    pub fn builder() -> MessageCountingMonitorBuilder<M> {
        MessageCountingMonitorBuilder::new()
    }
}

impl<M> MessageMonitor<M> for MessageCountingMonitor<M> {
    fn on_messages_ingested(&self, messages: &[M]) -> Result<Vec<CompletionHandle>, MonitorError> {
        let mut handles = Vec::with_capacity(messages.len());
        for message in messages {
            let tags = self.tag_extractor.extract(message)?;

            self.registry.counter(&self.ingested_name, &tags).increment();

            let processed = self.registry.counter(&self.processed_name, &tags);
            let success = self.registry.counter(&self.success_name, &tags);
            let failure = self.registry.counter(&self.failure_name, &tags);
            let ignored = self.registry.counter(&self.ignored_name, &tags);

            handles.push(CompletionHandle::new(move |outcome: Outcome| {
                match outcome.kind() {
                    OutcomeKind::Success => {
                        processed.increment();
                        success.increment();
                    }
                    OutcomeKind::Failure => {
                        processed.increment();
                        failure.increment();
                    }
                    OutcomeKind::Ignored => ignored.increment(),
                }
            }));
        }

        Ok(handles)
    }
}

/// Builder for [`MessageCountingMonitor`] instances
///
/// The series name prefix and the registry are required; the tag
/// extractor defaults to [`NoTags`]. Counters have no clock and no
/// publish-time parameters, so neither appears here.
pub struct MessageCountingMonitorBuilder<M> {
    meter_name_prefix: Option<SeriesName>,
    registry: Option<Arc<dyn SeriesRegistry>>,
    tag_extractor: Arc<dyn TagExtractor<M>>,
}

impl<M> MessageCountingMonitorBuilder<M> {
    /// Create a builder with default optional components
    pub fn new() -> Self {
        Self {
            meter_name_prefix: None,
            registry: None,
            tag_extractor: Arc::new(NoTags),
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

    /// Set the tag extractor partitioning series per message
    pub fn tag_extractor(mut self, tag_extractor: impl TagExtractor<M> + 'static) -> Self {
        self.tag_extractor = Arc::new(tag_extractor);
        self
    }

    /// Set the tag extractor from an infallible closure
    pub fn tag_extractor_fn(self, function: impl Fn(&M) -> Tags + Send + Sync + 'static) -> Self {
        self.tag_extractor(FnTagExtractor::new(function))
    }

    /// Build a monitor from the current configuration
    pub fn build(&self) -> Result<MessageCountingMonitor<M>, MonitorConfigError> {
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

        debug!(prefix = prefix.as_str(), "Building message counting monitor");

        Ok(MessageCountingMonitor {
            ingested_name: suffixed(prefix, INGESTED_COUNTER_SUFFIX)?,
            processed_name: suffixed(prefix, PROCESSED_COUNTER_SUFFIX)?,
            success_name: suffixed(prefix, SUCCESS_COUNTER_SUFFIX)?,
            failure_name: suffixed(prefix, FAILURE_COUNTER_SUFFIX)?,
            ignored_name: suffixed(prefix, IGNORED_COUNTER_SUFFIX)?,
            registry,
            tag_extractor: self.tag_extractor.clone(),
        })
    }
}

impl<M> Default for MessageCountingMonitorBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "counting_tests.rs"]
mod tests;
