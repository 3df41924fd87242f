//! Series identity types: names, tags, and timer creation options.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Tags
// ============================================================================

/// Single key/value dimension attached to a metric series
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    key: String,
    value: String,
}

impl Tag {
    /// Create new tag from key and value
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get tag key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get tag value
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Ordered set of tags identifying one series within a metric name
///
/// Tags are kept sorted by key with unique keys, so two collections built
/// from the same pairs in any insertion order compare and hash identically.
/// Inserting a key that is already present replaces its value.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Tags(Vec<Tag>);

impl Tags {
    /// Create empty tag set
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Create tag set with a single tag
    pub fn of(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::none().and(key, value)
    }

    /// Return a copy of this tag set with one more tag
    pub fn and(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(Tag::new(key, value));
        self
    }

    /// Insert a tag, replacing any existing tag with the same key
    pub fn insert(&mut self, tag: Tag) {
        match self.0.binary_search_by(|entry| entry.key().cmp(tag.key())) {
            Ok(index) => self.0[index] = tag,
            Err(index) => self.0.insert(index, tag),
        }
    }

    /// Look up the value for a key
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.0
            .binary_search_by(|entry| entry.key().cmp(key))
            .ok()
            .map(|index| self.0[index].value())
    }

    /// Number of tags in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set contains no tags
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over tags in key order
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    /// Iterate over tag keys in key order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|tag| tag.key())
    }

    /// Iterate over tag values in key order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|tag| tag.value())
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut tags = Self::none();
        for tag in iter {
            tags.insert(tag);
        }
        tags
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(key, value)| Tag::new(key, value))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for Tags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, tag) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", tag)?;
        }
        Ok(())
    }
}

// ============================================================================
// Series Names
// ============================================================================

/// Validated, dot-separated metric series name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesName(String);

impl SeriesName {
    /// Create new series name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        // Validate length
        if name.is_empty() || name.len() > 250 {
            return Err(ValidationError::OutOfRange {
                field: "series_name".to_string(),
                message: "must be 1-250 characters".to_string(),
            });
        }

        // Validate characters (ASCII alphanumeric, dots, hyphens, underscores)
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidFormat {
                field: "series_name".to_string(),
                message: "only ASCII alphanumeric, dots, hyphens, and underscores allowed"
                    .to_string(),
            });
        }

        // Validate no consecutive dots or leading/trailing dots
        if name.starts_with('.') || name.ends_with('.') || name.contains("..") {
            return Err(ValidationError::InvalidFormat {
                field: "series_name".to_string(),
                message: "no leading/trailing dots or consecutive dots".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Create series name by appending a dot-separated suffix to this name
    pub fn with_suffix(&self, suffix: &str) -> Result<Self, ValidationError> {
        Self::new(format!("{}.{}", self.0, suffix))
    }

    /// Get series name as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SeriesName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SeriesName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

// ============================================================================
// Timer Options
// ============================================================================

/// Creation-time options applied when a timer series is first registered
///
/// Options only take effect for the call that creates the series; later
/// lookups of an existing series return it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerOptions {
    /// Human-readable help text for the series
    pub description: Option<String>,
    /// Histogram bucket upper bounds in seconds, ascending
    pub buckets: Option<Vec<f64>>,
}

impl TimerOptions {
    /// Create new timer options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set help text
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set histogram bucket upper bounds in seconds
    pub fn with_buckets(mut self, buckets: Vec<f64>) -> Self {
        self.buckets = Some(buckets);
        self
    }
}

#[cfg(test)]
#[path = "series_tests.rs"]
mod tests;
