use chrono::{DateTime, Utc};
use model::records::watermark::Watermark;
use serde::{Deserialize, Serialize};

/// Persisted form of a watermark.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WatermarkEntry {
    #[serde(rename = "LastProcessedTime")]
    pub last_processed_time: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WatermarkEntry {
    pub fn new(watermark: Watermark) -> Self {
        Self {
            last_processed_time: watermark.timestamp(),
            updated_at: Utc::now(),
        }
    }

    pub fn watermark(&self) -> Watermark {
        Watermark::new(self.last_processed_time)
    }
}
