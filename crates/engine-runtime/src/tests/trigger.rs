use super::support::{StaticSource, recent_rows, runner, settings, spawn_sink};
use crate::{runner::SyncRunner, trigger::serve_on};
use axum::http::StatusCode;
use std::sync::{Arc, atomic::Ordering};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

async fn start(runner: Arc<SyncRunner>) -> (String, CancellationToken) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let cancel = CancellationToken::new();
    tokio::spawn(serve_on(listener, runner, cancel.clone()));
    (base, cancel)
}

async fn get(url: String) -> (u16, String, String) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    (status, content_type, response.text().await.unwrap())
}

#[tokio::test]
async fn health_answers_ok() {
    let (base, cancel) = start(runner(settings(None), StaticSource::new(Vec::new()))).await;

    let (status, _, body) = get(format!("{base}/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
    cancel.cancel();
}

#[tokio::test]
async fn incremental_trigger_reports_count() {
    let (sink_url, received) = spawn_sink(StatusCode::OK).await;
    let (base, cancel) = start(runner(settings(Some(&sink_url)), StaticSource::new(recent_rows(3)))).await;

    let (status, content_type, body) = get(format!("{base}/api/sync")).await;

    assert_eq!(status, 200);
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(body, "Incremental sync completed. Records synced: 3");
    assert_eq!(received.load(Ordering::SeqCst), 3);
    cancel.cancel();
}

#[tokio::test]
async fn bulk_trigger_over_post() {
    let (sink_url, _) = spawn_sink(StatusCode::OK).await;
    let (base, cancel) = start(runner(settings(Some(&sink_url)), StaticSource::new(recent_rows(4)))).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/sync?bulk=true"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.text().await.unwrap(),
        "Bulk load completed. Records synced: 4"
    );
    cancel.cancel();
}

#[tokio::test]
async fn bulk_on_empty_table_is_skipped() {
    let (sink_url, _) = spawn_sink(StatusCode::OK).await;
    let (base, cancel) = start(runner(settings(Some(&sink_url)), StaticSource::new(Vec::new()))).await;

    let (status, _, body) = get(format!("{base}/api/sync?mode=bulk")).await;
    assert_eq!(status, 200);
    assert_eq!(body, "Bulk load skipped: source table is empty");
    cancel.cancel();
}

#[tokio::test]
async fn failed_bulk_returns_500() {
    let (sink_url, _) = spawn_sink(StatusCode::SERVICE_UNAVAILABLE).await;
    let runner = runner(settings(Some(&sink_url)), StaticSource::new(recent_rows(3)));
    let (base, cancel) = start(runner.clone()).await;

    let (status, _, body) = get(format!("{base}/api/sync?bulk=true")).await;

    assert_eq!(status, 500);
    assert!(body.contains("Failed to publish batch at offset 0"));
    assert_eq!(runner.tracker().current().await, None);
    cancel.cancel();
}

#[tokio::test]
async fn missing_config_fails_bulk_but_not_incremental() {
    let (base, cancel) = start(runner(settings(None), StaticSource::new(recent_rows(1)))).await;

    let (status, _, body) = get(format!("{base}/api/sync")).await;
    assert_eq!(status, 200);
    assert_eq!(body, "Incremental sync completed. Records synced: 0");

    let (status, _, body) = get(format!("{base}/api/sync?bulk=true")).await;
    assert_eq!(status, 500);
    assert!(body.contains("TELESYNC_SINK_URL"));
    cancel.cancel();
}

#[tokio::test]
async fn rejects_unknown_flag_values() {
    let (base, cancel) = start(runner(settings(None), StaticSource::new(Vec::new()))).await;

    let (status, _, _) = get(format!("{base}/api/sync?bulk=maybe")).await;
    assert_eq!(status, 400);
    cancel.cancel();
}
