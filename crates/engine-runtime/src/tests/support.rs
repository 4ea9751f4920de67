use crate::{factory::SourceFactory, runner::SyncRunner};
use async_trait::async_trait;
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::{DateTime, Duration, Utc};
use engine_config::{
    env::EnvManager,
    settings::{SyncSettings, database::DatabaseSettings, vars},
};
use engine_core::{
    connectors::source::TelemetrySource,
    error::SourceError,
    state::{memory::MemoryWatermarkStore, tracker::WatermarkTracker},
};
use model::{
    core::value::Value,
    pagination::offset::PageRequest,
    records::{row::RowData, watermark::WatermarkKey},
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::net::TcpListener;

pub fn recent_rows(count: usize) -> Vec<RowData> {
    let start = Utc::now() - Duration::minutes(30);
    (0..count)
        .map(|i| {
            RowData::new("telemetry", vec![])
                .with("deviceId", Value::String(format!("dev-{i}")))
                .with("enqueuedTime", Value::Timestamp(start + Duration::seconds(i as i64)))
                .with("battery", Value::Int(50))
        })
        .collect()
}

/// Fixed in-memory table; counts how many cycles connected to it.
pub struct StaticSource {
    rows: Vec<RowData>,
    pub connects: AtomicUsize,
}

impl StaticSource {
    pub fn new(rows: Vec<RowData>) -> Arc<Self> {
        Arc::new(Self {
            rows,
            connects: AtomicUsize::new(0),
        })
    }

    fn ts(row: &RowData) -> DateTime<Utc> {
        row.get_value("enqueuedTime").as_timestamp().unwrap()
    }
}

#[async_trait]
impl TelemetrySource for StaticSource {
    async fn count(&self) -> Result<u64, SourceError> {
        Ok(self.rows.len() as u64)
    }

    async fn fetch_since(&self, since: DateTime<Utc>) -> Result<Vec<RowData>, SourceError> {
        Ok(self
            .rows
            .iter()
            .filter(|r| Self::ts(r) > since)
            .cloned()
            .collect())
    }

    async fn fetch_page(&self, page: PageRequest) -> Result<Vec<RowData>, SourceError> {
        Ok(self
            .rows
            .iter()
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}

pub struct StaticFactory(pub Arc<StaticSource>);

#[async_trait]
impl SourceFactory for StaticFactory {
    async fn connect(
        &self,
        _database: &DatabaseSettings,
        _table: &str,
    ) -> Result<Arc<dyn TelemetrySource>, SourceError> {
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.0.clone())
    }
}

pub fn settings(sink_url: Option<&str>) -> SyncSettings {
    let mut env = vec![
        (vars::DATABASE_URL, "postgres://reader@localhost/iot".to_string()),
        (vars::WATERMARK_PATH, "/tmp/telesync-unused".to_string()),
        (vars::BATCH_DELAY_MS, "0".to_string()),
        (vars::BATCH_SIZE, "2".to_string()),
    ];
    if let Some(url) = sink_url {
        env.push((vars::SINK_URL, url.to_string()));
    }
    SyncSettings::from_env(EnvManager::from_vars(env))
}

pub fn runner(settings: SyncSettings, source: Arc<StaticSource>) -> Arc<SyncRunner> {
    let tracker = WatermarkTracker::new(
        Arc::new(MemoryWatermarkStore::new()),
        WatermarkKey::default(),
        Duration::hours(1),
    );
    Arc::new(SyncRunner::new(
        settings,
        tracker,
        Arc::new(StaticFactory(source)),
    ))
}

#[derive(Clone)]
struct Ingest {
    status: StatusCode,
    received: Arc<AtomicUsize>,
}

async fn ingest(
    State(state): State<Ingest>,
    Json(records): Json<Vec<serde_json::Value>>,
) -> StatusCode {
    if state.status.is_success() {
        state.received.fetch_add(records.len(), Ordering::SeqCst);
    }
    state.status
}

/// Local ingestion endpoint answering every POST with `status`. Returns
/// its URL and the number of records it accepted.
pub async fn spawn_sink(status: StatusCode) -> (String, Arc<AtomicUsize>) {
    let received = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route("/ingest", post(ingest)).with_state(Ingest {
        status,
        received: received.clone(),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (format!("http://{addr}/ingest"), received)
}
