//! # Message-Meter Core
//!
//! Monitors for message-processing pipelines: measure how long handling
//! takes, how many messages flow through, and how busy the pipeline is,
//! partitioned by outcome and by per-message tags.
//!
//! This library provides:
//! - A `MessageMonitor` trait with batch ingestion and one-shot
//!   completion handles
//! - Outcome-partitioned latency timers, throughput counters, and a
//!   busy-ratio gauge
//! - Pluggable tag extraction to split series per message dimension
//! - Fan-out to several monitors behind a single handle
//!
//! Monitors record through the `meter-runtime` registry boundary and
//! never talk to a metrics backend directly.
//!
//! ## Module Organization
//!
//! - [`error`] - Error types for monitor construction and ingestion
//! - [`message`] - Message abstraction and a generic implementation
//! - [`tags`] - Tag extraction strategies
//! - [`monitor`] - The monitor trait, completion handles, and monitors

// Module declarations
pub mod error;
pub mod message;
pub mod monitor;
pub mod tags;

// Re-export commonly used types
pub use error::{MonitorConfigError, MonitorError, TagExtractionError};
pub use message::{GenericMessage, Message, MessageId};
pub use monitor::{
    CapacityMonitor, CapacityMonitorBuilder, CompletionHandle, MessageCountingMonitor,
    MessageCountingMonitorBuilder, MessageMonitor, MessageTimerMonitor, MessageTimerMonitorBuilder,
    MultiMessageMonitor, NoOpMessageMonitor, Outcome, OutcomeKind,
};
pub use tags::{
    FnTagExtractor, MetadataTagger, NoTags, PayloadTypeTagger, TagExtractor, PAYLOAD_TYPE_TAG,
};

/// Standard result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;
