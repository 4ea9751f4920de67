use crate::records::telemetry::TelemetryRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Records ascending by `enqueued_time`. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Batch {
    records: Vec<TelemetryRecord>,
}

impl Batch {
    /// Builds a batch, restoring ascending order if the input was not sorted
    /// (records stamped with the substitution time may land out of order).
    pub fn new(mut records: Vec<TelemetryRecord>) -> Self {
        if !records
            .windows(2)
            .all(|w| w[0].enqueued_time <= w[1].enqueued_time)
        {
            records.sort_by_key(|r| r.enqueued_time);
        }
        Batch { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    pub fn max_enqueued_time(&self) -> Option<DateTime<Utc>> {
        self.records.iter().map(|r| r.enqueued_time).max()
    }
}

impl FromIterator<TelemetryRecord> for Batch {
    fn from_iter<I: IntoIterator<Item = TelemetryRecord>>(iter: I) -> Self {
        Batch::new(iter.into_iter().collect())
    }
}
