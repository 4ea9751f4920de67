use crate::core::time;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PARTITION: &str = "telemetry-sync";
pub const DEFAULT_ROW: &str = "last-processed";

/// Fixed identifier of the watermark entry (partition + row).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatermarkKey {
    pub partition: String,
    pub row: String,
}

impl WatermarkKey {
    pub fn new(partition: impl Into<String>, row: impl Into<String>) -> Self {
        WatermarkKey {
            partition: partition.into(),
            row: row.into(),
        }
    }
}

impl Default for WatermarkKey {
    fn default() -> Self {
        WatermarkKey::new(DEFAULT_PARTITION, DEFAULT_ROW)
    }
}

impl fmt::Display for WatermarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition, self.row)
    }
}

/// Timestamp of the last record confirmed delivered to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Watermark(DateTime<Utc>);

impl Watermark {
    pub fn new(ts: DateTime<Utc>) -> Self {
        Watermark(ts)
    }

    /// The watermark used when none has been persisted yet.
    pub fn lookback(now: DateTime<Utc>, lookback: Duration) -> Self {
        Watermark(now - lookback)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Watermark {
    fn from(ts: DateTime<Utc>) -> Self {
        Watermark(ts)
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&time::format_millis(&self.0))
    }
}
