//! Freshness marker for a published corpus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata published alongside a corpus generation
///
/// The timestamp is supplied by the producer. Consumers only compare it
/// with `>`; nothing checks that it is monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    /// Seconds since the Unix epoch
    pub last_updated_timestamp: f64,
}

impl ContentMetadata {
    pub fn new(last_updated_timestamp: f64) -> Self {
        Self {
            last_updated_timestamp,
        }
    }

    /// Metadata stamped with the given wall-clock time
    pub fn at(time: DateTime<Utc>) -> Self {
        Self::new(time.timestamp_micros() as f64 / 1_000_000.0)
    }

    /// Metadata stamped with the current wall-clock time
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Whether this generation is strictly newer than `other`
    pub fn is_newer_than(&self, other: &ContentMetadata) -> bool {
        self.last_updated_timestamp > other.last_updated_timestamp
    }
}
