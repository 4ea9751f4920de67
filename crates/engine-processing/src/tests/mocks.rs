use crate::{
    reader::SnapshotReader,
    sync::orchestrator::{SyncOptions, SyncOrchestrator},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use connectors::sql::base::error::DbError;
use engine_core::{
    connectors::{sink::Sink, source::TelemetrySource},
    error::{SinkError, SourceError},
    metrics::Metrics,
    retry::RetryPolicy,
    state::{memory::MemoryWatermarkStore, tracker::WatermarkTracker},
};
use model::{
    core::value::Value,
    pagination::offset::PageRequest,
    records::{batch::Batch, row::RowData, watermark::WatermarkKey},
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Count,
    Since(DateTime<Utc>),
    Page(PageRequest),
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
}

pub fn row_at(device: &str, ts: DateTime<Utc>) -> RowData {
    RowData::new("telemetry", vec![])
        .with("deviceId", Value::String(device.into()))
        .with("enqueuedTime", Value::Timestamp(ts))
        .with("battery", Value::Float(90.0))
        .with("Anomaly", Value::Boolean(false))
}

/// `count` rows one second apart, starting at `base_time()`.
pub fn rows(count: usize) -> Vec<RowData> {
    (0..count)
        .map(|i| row_at(&format!("dev-{}", i % 7), base_time() + Duration::seconds(i as i64)))
        .collect()
}

/// In-memory table honoring the source contract: rows kept ascending.
pub struct MockSource {
    rows: Vec<RowData>,
    queries: Mutex<Vec<Query>>,
    broken: bool,
}

impl MockSource {
    pub fn new(rows: Vec<RowData>) -> Self {
        Self {
            rows,
            queries: Mutex::new(Vec::new()),
            broken: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }

    pub fn page_queries(&self) -> Vec<PageRequest> {
        self.queries()
            .into_iter()
            .filter_map(|q| match q {
                Query::Page(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    fn log(&self, query: Query) -> Result<(), SourceError> {
        self.queries.lock().unwrap().push(query);
        if self.broken {
            return Err(SourceError::Database(DbError::Decode(
                "column \"enqueuedTime\" has unexpected type".into(),
            )));
        }
        Ok(())
    }

    fn ts(row: &RowData) -> DateTime<Utc> {
        row.get_value("enqueuedTime").as_timestamp().unwrap()
    }
}

#[async_trait]
impl TelemetrySource for MockSource {
    async fn count(&self) -> Result<u64, SourceError> {
        self.log(Query::Count)?;
        Ok(self.rows.len() as u64)
    }

    async fn fetch_since(&self, since: DateTime<Utc>) -> Result<Vec<RowData>, SourceError> {
        self.log(Query::Since(since))?;
        Ok(self
            .rows
            .iter()
            .filter(|r| Self::ts(r) > since)
            .cloned()
            .collect())
    }

    async fn fetch_page(&self, page: PageRequest) -> Result<Vec<RowData>, SourceError> {
        self.log(Query::Page(page))?;
        Ok(self
            .rows
            .iter()
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Sink answering from a script of outcomes; accepts everything once the
/// script runs out.
#[derive(Default)]
pub struct MockSink {
    script: Mutex<VecDeque<bool>>,
    delivered: Mutex<Vec<Batch>>,
    attempts: Mutex<usize>,
}

impl MockSink {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn scripted(outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn delivered(&self) -> Vec<Batch> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Sink for MockSink {
    async fn write_batch(&self, batch: &Batch) -> Result<(), SinkError> {
        *self.attempts.lock().unwrap() += 1;
        let accept = self.script.lock().unwrap().pop_front().unwrap_or(true);
        if !accept {
            return Err(SinkError::Status {
                status: 503,
                body: "Service Unavailable".into(),
            });
        }
        self.delivered.lock().unwrap().push(batch.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub struct Harness {
    pub source: Arc<MockSource>,
    pub sink: Arc<MockSink>,
    pub tracker: WatermarkTracker,
    pub metrics: Metrics,
    pub orchestrator: SyncOrchestrator,
}

impl Harness {
    pub fn new(source: MockSource, sink: MockSink, options: SyncOptions) -> Self {
        let source = Arc::new(source);
        let sink = Arc::new(sink);
        let metrics = Metrics::new();
        let tracker = WatermarkTracker::new(
            Arc::new(MemoryWatermarkStore::new()),
            WatermarkKey::default(),
            Duration::hours(1),
        );

        let reader = SnapshotReader::new(source.clone(), RetryPolicy::none(), metrics.clone());
        let orchestrator = SyncOrchestrator::new(
            reader,
            sink.clone(),
            tracker.clone(),
            metrics.clone(),
            options,
        );

        Self {
            source,
            sink,
            tracker,
            metrics,
            orchestrator,
        }
    }

    pub fn no_delay(batch_size: usize) -> SyncOptions {
        SyncOptions {
            batch_size,
            batch_delay: std::time::Duration::ZERO,
        }
    }
}
