use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Incremental,
    Bulk,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Incremental => write!(f, "incremental"),
            SyncMode::Bulk => write!(f, "bulk"),
        }
    }
}

/// Steps of a single sync cycle. Every cycle starts and ends in `Idle`;
/// an empty query or a failed publish returns there without touching the
/// watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    ReadingWatermark,
    Querying,
    Publishing,
    AdvancingWatermark,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Idle => "idle",
            SyncPhase::ReadingWatermark => "reading_watermark",
            SyncPhase::Querying => "querying",
            SyncPhase::Publishing => "publishing",
            SyncPhase::AdvancingWatermark => "advancing_watermark",
        };
        f.write_str(name)
    }
}
