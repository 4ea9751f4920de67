use crate::{
    error::SyncError,
    reader::SnapshotReader,
    sync::{
        phase::{SyncMode, SyncPhase},
        report::BulkReport,
    },
    transform::transform_rows,
};
use chrono::{DateTime, Utc};
use engine_core::{connectors::sink::Sink, metrics::Metrics, state::tracker::WatermarkTracker};
use model::{
    pagination::offset::{DEFAULT_PAGE_SIZE, OffsetPager},
    records::watermark::Watermark,
};
use std::{sync::Arc, time::Duration};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

/// Tunables for a sync cycle.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Page size for bulk loads.
    pub batch_size: usize,
    /// Pause between bulk pages.
    pub batch_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_PAGE_SIZE,
            batch_delay: Duration::from_millis(200),
        }
    }
}

/// Drives one sync cycle end to end: watermark, query, transform, publish,
/// advance.
pub struct SyncOrchestrator {
    reader: SnapshotReader,
    sink: Arc<dyn Sink>,
    tracker: WatermarkTracker,
    metrics: Metrics,
    options: SyncOptions,
}

impl SyncOrchestrator {
    pub fn new(
        reader: SnapshotReader,
        sink: Arc<dyn Sink>,
        tracker: WatermarkTracker,
        metrics: Metrics,
        options: SyncOptions,
    ) -> Self {
        Self {
            reader,
            sink,
            tracker,
            metrics,
            options,
        }
    }

    /// Publishes every row newer than the watermark as one batch.
    ///
    /// Returns the number of records delivered. Failures of any kind end
    /// the cycle with 0 and leave the watermark untouched.
    pub async fn run_incremental(&self) -> usize {
        let span = info_span!("sync_cycle", cycle_id = %Uuid::new_v4(), mode = %SyncMode::Incremental);

        async {
            self.metrics.increment_cycles();
            let published = match self.incremental().await {
                Ok(count) => count,
                Err(err) => {
                    error!(%err, "Incremental sync failed");
                    0
                }
            };
            self.enter(SyncPhase::Idle);

            let totals = self.metrics.snapshot();
            info!(
                published,
                total_published = totals.records_published,
                publish_failures = totals.publish_failures,
                retries = totals.retry_count,
                "Incremental sync finished"
            );
            published
        }
        .instrument(span)
        .await
    }

    async fn incremental(&self) -> Result<usize, SyncError> {
        self.enter(SyncPhase::ReadingWatermark);
        let watermark = self.tracker.get().await;

        self.enter(SyncPhase::Querying);
        let rows = self.reader.fetch_since(watermark.timestamp()).await?;
        if rows.is_empty() {
            info!(%watermark, "No new telemetry since watermark");
            return Ok(0);
        }

        let batch = transform_rows(&rows, Utc::now());
        drop(rows);

        self.enter(SyncPhase::Publishing);
        if !self.sink.publish(&batch).await {
            self.metrics.increment_failures();
            warn!(records = batch.len(), %watermark, "Publish failed, watermark unchanged");
            return Ok(0);
        }
        self.metrics.record_published(batch.len() as u64);

        self.enter(SyncPhase::AdvancingWatermark);
        if let Some(max) = batch.max_enqueued_time() {
            self.tracker
                .advance(Some(watermark), Watermark::new(max))
                .await;
        }

        Ok(batch.len())
    }

    /// Publishes the whole source table page by page.
    ///
    /// The watermark moves once, after the last page is delivered. A failed
    /// page aborts the load; pages already delivered stay delivered.
    pub async fn run_bulk(&self) -> Result<BulkReport, SyncError> {
        let span = info_span!("sync_cycle", cycle_id = %Uuid::new_v4(), mode = %SyncMode::Bulk);

        async {
            self.metrics.increment_cycles();
            let result = self.bulk().await;
            self.enter(SyncPhase::Idle);

            match &result {
                Ok(report) => info!(
                    total_rows = report.total_rows,
                    published = report.records_published,
                    batches = report.batches_published,
                    watermark = ?report.watermark.map(|w| w.to_string()),
                    "Bulk load finished"
                ),
                Err(err) => error!(%err, "Bulk load aborted"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn bulk(&self) -> Result<BulkReport, SyncError> {
        self.enter(SyncPhase::Querying);
        let total_rows = self.reader.count().await?;
        if total_rows == 0 {
            info!(source = self.reader.source_name(), "Source table is empty, skipping bulk load");
            return Ok(BulkReport::empty_source());
        }

        let batch_size = self.options.batch_size;
        info!(
            total_rows,
            batch_size,
            pages = OffsetPager::expected_pages(total_rows as usize, batch_size),
            "Starting bulk load"
        );

        let mut pager = OffsetPager::new(total_rows as usize, batch_size);
        let mut records_published = 0usize;
        let mut batches_published = 0usize;
        let mut max_seen: Option<DateTime<Utc>> = None;

        while let Some(page) = pager.next_request() {
            if batches_published > 0 && !self.options.batch_delay.is_zero() {
                tokio::time::sleep(self.options.batch_delay).await;
            }

            self.enter(SyncPhase::Querying);
            let rows = self.reader.fetch_page(page).await?;
            pager.advance(rows.len());
            if rows.is_empty() {
                break;
            }

            let batch = transform_rows(&rows, Utc::now());
            drop(rows);

            self.enter(SyncPhase::Publishing);
            if !self.sink.publish(&batch).await {
                self.metrics.increment_failures();
                return Err(SyncError::Publish {
                    offset: page.offset,
                    batch_size: batch.len(),
                });
            }

            self.metrics.record_published(batch.len() as u64);
            records_published += batch.len();
            batches_published += 1;
            max_seen = max_seen.max(batch.max_enqueued_time());

            info!(
                offset = page.offset,
                records = batch.len(),
                running_total = records_published,
                "Bulk batch published"
            );
        }

        self.enter(SyncPhase::ReadingWatermark);
        let previous = self.tracker.current().await;
        let watermark = match max_seen {
            Some(max) => {
                self.enter(SyncPhase::AdvancingWatermark);
                let candidate = Watermark::new(max);
                self.tracker.advance(previous, candidate).await;
                Some(previous.map_or(candidate, |prev| prev.max(candidate)))
            }
            None => previous,
        };

        Ok(BulkReport {
            total_rows,
            records_published,
            batches_published,
            watermark,
        })
    }

    fn enter(&self, phase: SyncPhase) {
        debug!(%phase, "Sync phase");
    }
}
