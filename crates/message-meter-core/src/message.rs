//! Message abstraction consumed by monitors.
//!
//! Monitors are generic over the message type they observe. Nothing about
//! ingestion or completion requires message introspection, so arbitrary
//! payload types work out of the box. The [`Message`] trait exists for the
//! stock tag extractors, which need a payload type descriptor and a string
//! metadata mapping; [`GenericMessage`] is a ready-made implementation for
//! pipelines without a message type of their own.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unique identifier for a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Generate a new unique message ID
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the ID as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only view of a message, as much of it as tag extraction needs
///
/// # Thread Safety
///
/// Messages cross thread boundaries between ingestion and completion in
/// most pipelines, so implementations must be `Send + Sync`.
pub trait Message: Send + Sync {
    /// Describe the payload variant this message carries
    fn payload_type(&self) -> &str;

    /// Metadata entries attached to the message
    fn metadata(&self) -> &HashMap<String, String>;

    /// Look up a single metadata value
    fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata().get(key).map(String::as_str)
    }
}

/// General-purpose message carrying a payload type descriptor and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericMessage {
    id: MessageId,
    payload_type: String,
    metadata: HashMap<String, String>,
}

impl GenericMessage {
    /// Create a new message with the given payload type descriptor
    pub fn new(payload_type: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            payload_type: payload_type.into(),
            metadata: HashMap::new(),
        }
    }

    /// Add a metadata entry, replacing any existing value for the key
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Get the message ID
    pub fn id(&self) -> &MessageId {
        &self.id
    }
}

impl Message for GenericMessage {
    fn payload_type(&self) -> &str {
        &self.payload_type
    }

    fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
