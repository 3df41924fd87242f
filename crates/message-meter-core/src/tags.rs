//! Tag extraction strategies.
//!
//! A tag extractor maps one message to the tag set that partitions its
//! series. Extractors are fixed at monitor build time and invoked once per
//! message during ingestion; returning different tags for different
//! messages is what splits one logical series into per-dimension series.
//!
//! Extraction failures propagate out of the ingestion call unchanged. A
//! failing extractor means the monitor is misconfigured for the messages
//! it observes, and recording under guessed tags would hide that.

use crate::error::TagExtractionError;
use crate::message::Message;
use meter_runtime::Tags;

/// Tag key written by [`PayloadTypeTagger`]
pub const PAYLOAD_TYPE_TAG: &str = "payloadType";

/// Strategy mapping one message to the tags that partition its series
///
/// # Thread Safety
///
/// Extractors are shared by reference from whichever thread ingests a
/// batch, so implementations must be thread-safe.
pub trait TagExtractor<M>: Send + Sync {
    /// Compute the tag set for one message
    fn extract(&self, message: &M) -> Result<Tags, TagExtractionError>;
}

/// Extractor yielding no tags, the default for every monitor
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTags;

impl<M> TagExtractor<M> for NoTags {
    fn extract(&self, _message: &M) -> Result<Tags, TagExtractionError> {
        Ok(Tags::none())
    }
}

/// Extractor tagging each message with its payload type
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadTypeTagger;

impl<M: Message> TagExtractor<M> for PayloadTypeTagger {
    fn extract(&self, message: &M) -> Result<Tags, TagExtractionError> {
        Ok(Tags::of(PAYLOAD_TYPE_TAG, message.payload_type()))
    }
}

/// Extractor tagging each message with the value of one metadata key
///
/// The tag key defaults to the metadata key and can be changed with
/// [`with_tag_key`](Self::with_tag_key). A message that does not carry
/// the metadata key fails extraction.
#[derive(Debug, Clone)]
pub struct MetadataTagger {
    metadata_key: String,
    tag_key: String,
}

impl MetadataTagger {
    /// Create an extractor reading the given metadata key
    pub fn new(metadata_key: impl Into<String>) -> Self {
        let metadata_key = metadata_key.into();
        Self {
            tag_key: metadata_key.clone(),
            metadata_key,
        }
    }

    /// Publish under a different tag key than the metadata key
    pub fn with_tag_key(mut self, tag_key: impl Into<String>) -> Self {
        self.tag_key = tag_key.into();
        self
    }
}

impl<M: Message> TagExtractor<M> for MetadataTagger {
    fn extract(&self, message: &M) -> Result<Tags, TagExtractionError> {
        let value = message.metadata_value(&self.metadata_key).ok_or_else(|| {
            TagExtractionError::MissingMetadata {
                key: self.metadata_key.clone(),
            }
        })?;

        Ok(Tags::of(self.tag_key.clone(), value))
    }
}

/// Adapter exposing an infallible closure as a [`TagExtractor`]
///
/// Coherence rules keep a bare closure from implementing the trait
/// directly, so closures go through this wrapper:
///
/// ```rust
/// use message_meter_core::tags::{FnTagExtractor, TagExtractor};
/// use meter_runtime::Tags;
///
/// let extractor = FnTagExtractor::new(|length: &usize| {
///     Tags::of("bucket", if *length > 100 { "large" } else { "small" })
/// });
///
/// let tags = extractor.extract(&150).unwrap();
/// assert_eq!(tags.value_of("bucket"), Some("large"));
/// ```
pub struct FnTagExtractor<F> {
    function: F,
}

impl<F> FnTagExtractor<F> {
    /// Wrap a closure from message reference to tags
    pub fn new(function: F) -> Self {
        Self { function }
    }
}

impl<M, F> TagExtractor<M> for FnTagExtractor<F>
where
    F: Fn(&M) -> Tags + Send + Sync,
{
    fn extract(&self, message: &M) -> Result<Tags, TagExtractionError> {
        Ok((self.function)(message))
    }
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tests;
