//! Clock abstraction and timestamps for latency measurement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::RwLock;
use std::time::Duration;

/// Timestamp wrapper for consistent time handling
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create timestamp for current time
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create timestamp from DateTime
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get underlying DateTime
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Elapsed time since an earlier timestamp
    ///
    /// Clamps to zero when `earlier` is actually in the future, so latency
    /// measurements taken across a non-monotonic clock can never underflow.
    pub fn duration_since(&self, earlier: &Timestamp) -> Duration {
        (self.0 - earlier.0).to_std().unwrap_or(Duration::ZERO)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dt = s.parse::<DateTime<Utc>>()?;
        Ok(Self::from_datetime(dt))
    }
}

/// Source of the current time for monitors
///
/// Monitors read the clock once per ingestion batch and once per completion.
/// Swapping in a [`ManualClock`] makes latency assertions deterministic.
pub trait Clock: Send + Sync {
    /// Read the current time
    fn now(&self) -> Timestamp;
}

/// Clock backed by the system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create new system clock
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Manually driven clock for deterministic tests
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    /// Create manual clock starting at the given time
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: RwLock::new(start.as_datetime()),
        }
    }

    /// Create manual clock starting at the current wall clock time
    pub fn starting_now() -> Self {
        Self::new(Timestamp::now())
    }

    /// Move the clock by a signed offset; negative offsets wind it backwards
    pub fn advance(&self, offset: chrono::Duration) {
        let mut now = self.now.write().unwrap();
        *now += offset;
    }

    /// Set the clock to an absolute time
    pub fn set(&self, to: Timestamp) {
        let mut now = self.now.write().unwrap();
        *now = to.as_datetime();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(*self.now.read().unwrap())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
