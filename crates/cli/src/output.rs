use crate::error::CliError;
use engine_runtime::runner::SyncSummary;
use model::records::watermark::{Watermark, WatermarkKey};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SyncOutput {
    mode: &'static str,
    records_synced: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_rows: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    batches: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    watermark: Option<String>,
    message: String,
}

#[derive(Debug, Serialize)]
struct WatermarkOutput<'a> {
    partition: &'a str,
    row: &'a str,
    #[serde(rename = "LastProcessedTime")]
    last_processed_time: Option<String>,
    /// Where the next incremental cycle would start.
    effective: String,
}

pub fn sync_summary(summary: &SyncSummary, as_json: bool) -> Result<String, CliError> {
    if !as_json {
        return Ok(summary.to_string());
    }

    let output = match summary {
        SyncSummary::Incremental(count) => SyncOutput {
            mode: "incremental",
            records_synced: *count,
            total_rows: None,
            batches: None,
            watermark: None,
            message: summary.to_string(),
        },
        SyncSummary::Bulk(report) => SyncOutput {
            mode: "bulk",
            records_synced: report.records_published,
            total_rows: Some(report.total_rows),
            batches: Some(report.batches_published),
            watermark: report.watermark.map(|w| w.to_string()),
            message: summary.to_string(),
        },
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn watermark(
    key: &WatermarkKey,
    stored: Option<Watermark>,
    effective: Watermark,
    as_json: bool,
) -> Result<String, CliError> {
    if as_json {
        let output = WatermarkOutput {
            partition: &key.partition,
            row: &key.row,
            last_processed_time: stored.map(|w| w.to_string()),
            effective: effective.to_string(),
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    Ok(match stored {
        Some(wm) => format!("{key}: {wm}"),
        None => format!("{key}: not set (next cycle starts after {effective})"),
    })
}
