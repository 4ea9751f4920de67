use crate::{
    error::RuntimeError,
    factory::{PostgresSourceFactory, SourceFactory},
};
use chrono::Duration as ChronoDuration;
use engine_config::settings::{DEFAULT_LOOKBACK_SECS, ResolvedSettings, SyncSettings};
use engine_core::{
    connectors::sink::http::HttpSink,
    metrics::Metrics,
    retry::RetryPolicy,
    state::{sled_store::SledWatermarkStore, tracker::WatermarkTracker},
};
use engine_processing::{
    reader::SnapshotReader,
    sync::{
        orchestrator::{SyncOptions, SyncOrchestrator},
        phase::SyncMode,
        report::BulkReport,
    },
};
use std::{fmt, sync::Arc};
use tracing::{error, info, warn};

/// What a triggered sync achieved.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncSummary {
    Incremental(usize),
    Bulk(BulkReport),
}

impl SyncSummary {
    pub fn records_synced(&self) -> usize {
        match self {
            SyncSummary::Incremental(count) => *count,
            SyncSummary::Bulk(report) => report.records_published,
        }
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncSummary::Incremental(count) => {
                write!(f, "Incremental sync completed. Records synced: {count}")
            }
            SyncSummary::Bulk(report) if report.skipped() => {
                write!(f, "Bulk load skipped: source table is empty")
            }
            SyncSummary::Bulk(report) => write!(
                f,
                "Bulk load completed. Records synced: {}",
                report.records_published
            ),
        }
    }
}

/// Entry point shared by the scheduler, the HTTP trigger and the CLI.
///
/// Configuration is resolved on every invocation and the source is
/// connected per cycle; the watermark store, HTTP client and metrics live
/// for the whole process.
pub struct SyncRunner {
    settings: SyncSettings,
    tracker: WatermarkTracker,
    metrics: Metrics,
    sources: Arc<dyn SourceFactory>,
    http: reqwest::Client,
}

impl SyncRunner {
    pub fn new(
        settings: SyncSettings,
        tracker: WatermarkTracker,
        sources: Arc<dyn SourceFactory>,
    ) -> Self {
        Self {
            settings,
            tracker,
            metrics: Metrics::new(),
            sources,
            http: reqwest::Client::new(),
        }
    }

    /// Production wiring: sled watermark store and Postgres source.
    pub fn from_settings(settings: SyncSettings) -> Self {
        let tracker = open_tracker(&settings);
        Self::new(settings, tracker, Arc::new(PostgresSourceFactory))
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn tracker(&self) -> &WatermarkTracker {
        &self.tracker
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub async fn run(&self, mode: SyncMode) -> Result<SyncSummary, RuntimeError> {
        match mode {
            SyncMode::Incremental => Ok(SyncSummary::Incremental(self.run_incremental().await)),
            SyncMode::Bulk => Ok(SyncSummary::Bulk(self.run_bulk().await?)),
        }
    }

    /// Never fails: incomplete configuration or an unreachable source
    /// count as a cycle that synced nothing.
    pub async fn run_incremental(&self) -> usize {
        let resolved = match self.settings.resolve() {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(%err, "Sync configuration incomplete, skipping incremental cycle");
                return 0;
            }
        };

        match self.orchestrator(&resolved).await {
            Ok(orchestrator) => orchestrator.run_incremental().await,
            Err(err) => {
                error!(%err, "Failed to prepare incremental cycle");
                0
            }
        }
    }

    pub async fn run_bulk(&self) -> Result<BulkReport, RuntimeError> {
        let resolved = self.settings.resolve()?;
        let orchestrator = self.orchestrator(&resolved).await?;
        Ok(orchestrator.run_bulk().await?)
    }

    async fn orchestrator(
        &self,
        resolved: &ResolvedSettings,
    ) -> Result<SyncOrchestrator, RuntimeError> {
        let source = self
            .sources
            .connect(&resolved.database, &resolved.source_table)
            .await?;
        let reader = SnapshotReader::new(source, RetryPolicy::for_database(), self.metrics.clone());
        let sink = HttpSink::with_client(self.http.clone(), resolved.sink_url.clone());

        Ok(SyncOrchestrator::new(
            reader,
            Arc::new(sink),
            self.tracker.clone(),
            self.metrics.clone(),
            SyncOptions {
                batch_size: resolved.batch_size,
                batch_delay: resolved.batch_delay,
            },
        ))
    }
}

/// Opens the sled watermark store, falling back to a detached tracker when
/// the store is not configured or cannot be opened.
pub fn open_tracker(settings: &SyncSettings) -> WatermarkTracker {
    let key = settings.watermark_key();
    let lookback = settings.lookback().unwrap_or_else(|err| {
        warn!(%err, "Invalid lookback, using default");
        ChronoDuration::seconds(DEFAULT_LOOKBACK_SECS)
    });

    let watermark = match settings.watermark() {
        Ok(watermark) => watermark,
        Err(err) => {
            warn!(%err, "Watermark store not configured, progress will not be persisted");
            return WatermarkTracker::detached(key, lookback);
        }
    };

    match SledWatermarkStore::open(&watermark.path) {
        Ok(store) => {
            info!(path = %watermark.path.display(), key = %watermark.key, "Opened watermark store");
            WatermarkTracker::new(Arc::new(store), watermark.key, watermark.lookback)
        }
        Err(err) => {
            warn!(path = %watermark.path.display(), %err, "Failed to open watermark store");
            WatermarkTracker::detached(key, lookback)
        }
    }
}
