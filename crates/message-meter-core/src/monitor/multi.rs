//! Fan-out to several monitors at once.

use crate::error::MonitorError;
use crate::monitor::{CompletionHandle, MessageMonitor, Outcome};
use std::sync::Arc;

/// Monitor delegating every ingestion to an ordered list of monitors
///
/// Each aggregate handle owns one delegate handle per delegate monitor;
/// resolving it resolves them all with the same outcome. An extraction
/// error from any delegate aborts the whole ingestion, and handles
/// already produced by earlier delegates are dropped unresolved, which
/// records nothing.
pub struct MultiMessageMonitor<M> {
    delegates: Vec<Arc<dyn MessageMonitor<M>>>,
}

impl<M> MultiMessageMonitor<M> {
    /// Create a monitor fanning out to the given delegates, in order
    pub fn new(delegates: Vec<Arc<dyn MessageMonitor<M>>>) -> Self {
        Self { delegates }
    }

    /// Number of delegate monitors
    pub fn delegate_count(&self) -> usize {
        self.delegates.len()
    }
}

impl<M> MessageMonitor<M> for MultiMessageMonitor<M> {
    fn on_messages_ingested(&self, messages: &[M]) -> Result<Vec<CompletionHandle>, MonitorError> {
        let mut per_delegate = Vec::with_capacity(self.delegates.len());
        for delegate in &self.delegates {
            per_delegate.push(delegate.on_messages_ingested(messages)?.into_iter());
        }

        // Transpose: delegate-major handle lists into one aggregate
        // handle per message
        let mut handles = Vec::with_capacity(messages.len());
        for _ in 0..messages.len() {
            let delegate_handles: Vec<CompletionHandle> = per_delegate
                .iter_mut()
                .filter_map(Iterator::next)
                .collect();

            handles.push(CompletionHandle::new(move |outcome: Outcome| {
                for handle in delegate_handles {
                    handle.resolve(outcome.clone());
                }
            }));
        }

        Ok(handles)
    }
}

#[cfg(test)]
#[path = "multi_tests.rs"]
mod tests;
