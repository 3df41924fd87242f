//! Message monitors and completion handles.
//!
//! A monitor observes batches of messages entering a processing pipeline
//! and hands back one [`CompletionHandle`] per message. The pipeline keeps
//! the handle alongside the message and resolves it with the terminal
//! [`Outcome`] once handling finished; whatever the monitor measures is
//! recorded at that point. Ingestion and resolution are both synchronous
//! and perform no I/O beyond the series registry boundary.
//!
//! Monitors included here:
//! - [`MessageTimerMonitor`] - outcome-partitioned latency timers
//! - [`MessageCountingMonitor`] - outcome-partitioned throughput counters
//! - [`CapacityMonitor`] - busy-ratio gauge over a sliding window
//! - [`MultiMessageMonitor`] - fan-out to several monitors at once
//! - [`NoOpMessageMonitor`] - observes nothing, for wiring defaults

mod capacity;
mod counting;
mod multi;
mod timer;

pub use capacity::{CapacityMonitor, CapacityMonitorBuilder};
pub use counting::{MessageCountingMonitor, MessageCountingMonitorBuilder};
pub use multi::MultiMessageMonitor;
pub use timer::{MessageTimerMonitor, MessageTimerMonitorBuilder};

use crate::error::{MonitorConfigError, MonitorError};
use meter_runtime::SeriesName;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Terminal classification of one message's processing
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The message was handled to completion
    Success,
    /// Handling failed; the optional cause is carried for consumers that
    /// want it and never changes what gets recorded
    Failure {
        cause: Option<Arc<dyn Error + Send + Sync>>,
    },
    /// The handler decided the message needed no processing
    Ignored,
}

impl Outcome {
    /// Failure outcome without a cause
    pub fn failure() -> Self {
        Self::Failure { cause: None }
    }

    /// Get the plain three-way discriminant
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success => OutcomeKind::Success,
            Self::Failure { .. } => OutcomeKind::Failure,
            Self::Ignored => OutcomeKind::Ignored,
        }
    }
}

/// Discriminant of an [`Outcome`], without the failure cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    Failure,
    Ignored,
}

impl OutcomeKind {
    /// Get the outcome name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Ignored => "ignored",
        }
    }
}

/// One-shot token reporting the outcome of one ingested message
///
/// Every handle belongs to exactly one message occurrence in one
/// ingestion call. Resolving consumes the handle, so an outcome can be
/// reported at most once; a second report does not compile. A handle
/// dropped unresolved records nothing.
///
/// Handles are `Send` and may be resolved from any thread, at any later
/// time, in any order across a batch.
pub struct CompletionHandle {
    action: Box<dyn FnOnce(Outcome) + Send>,
}

impl CompletionHandle {
    /// Create a handle running the given action on resolution
    pub fn new(action: impl FnOnce(Outcome) + Send + 'static) -> Self {
        Self {
            action: Box::new(action),
        }
    }

    /// Create a handle that records nothing
    pub fn no_op() -> Self {
        Self::new(|_| {})
    }

    /// Resolve with an outcome, consuming the handle
    pub fn resolve(self, outcome: Outcome) {
        (self.action)(outcome);
    }

    /// Resolve as successfully handled
    pub fn report_success(self) {
        self.resolve(Outcome::Success);
    }

    /// Resolve as failed, with an optional cause
    pub fn report_failure(self, cause: Option<Arc<dyn Error + Send + Sync>>) {
        self.resolve(Outcome::Failure { cause });
    }

    /// Resolve as ignored by the handler
    pub fn report_ignored(self) {
        self.resolve(Outcome::Ignored);
    }
}

impl fmt::Debug for CompletionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionHandle").finish_non_exhaustive()
    }
}

/// Monitor observing messages entering a processing pipeline
///
/// # Handle Ordering
///
/// The batch operation returns handles in input order: the handle at
/// index `i` belongs to `messages[i]`. Duplicate messages in one batch
/// are unambiguous because every occurrence gets its own handle.
///
/// # Thread Safety
///
/// Ingestion runs on the caller's thread. The returned handles may move
/// to other threads and be resolved there; implementations must share no
/// mutable state between handles beyond the series registry.
pub trait MessageMonitor<M>: Send + Sync {
    /// Observe a batch of ingested messages, returning one completion
    /// handle per message in input order
    fn on_messages_ingested(&self, messages: &[M]) -> Result<Vec<CompletionHandle>, MonitorError>;

    /// Observe a single ingested message
    fn on_message_ingested(&self, message: &M) -> Result<CompletionHandle, MonitorError> {
        let mut handles = self.on_messages_ingested(std::slice::from_ref(message))?;
        debug_assert_eq!(handles.len(), 1, "one handle per ingested message");
        Ok(handles.pop().unwrap_or_else(CompletionHandle::no_op))
    }
}

/// Monitor that observes nothing
///
/// Useful as a default where a pipeline requires a monitor but none is
/// configured. Ingestion succeeds for any message type and every handle
/// discards its outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMessageMonitor;

impl<M> MessageMonitor<M> for NoOpMessageMonitor {
    fn on_messages_ingested(&self, messages: &[M]) -> Result<Vec<CompletionHandle>, MonitorError> {
        Ok(messages.iter().map(|_| CompletionHandle::no_op()).collect())
    }
}

/// Derive a suffixed series name from a validated prefix
///
/// Failure is only reachable when the combined name breaks the series
/// name rules, such as exceeding the length limit.
pub(crate) fn suffixed(
    prefix: &SeriesName,
    suffix: &str,
) -> Result<SeriesName, MonitorConfigError> {
    prefix
        .with_suffix(suffix)
        .map_err(|error| MonitorConfigError::Invalid {
            field: "meter_name_prefix".to_string(),
            message: error.to_string(),
        })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
