use crate::{error::RuntimeError, runner::SyncRunner};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use engine_processing::sync::phase::SyncMode;
use serde::Deserialize;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Query string of `/api/sync`.
#[derive(Debug, Default, Deserialize)]
pub struct SyncParams {
    pub bulk: Option<String>,
    pub mode: Option<String>,
}

impl SyncParams {
    /// `bulk` wins over `mode`; neither means incremental.
    pub fn sync_mode(&self) -> Result<SyncMode, String> {
        if let Some(flag) = self.bulk.as_deref() {
            return match flag.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(SyncMode::Bulk),
                "false" | "0" | "no" | "" => Ok(SyncMode::Incremental),
                other => Err(format!("Invalid value for 'bulk': {other}")),
            };
        }

        match self.mode.as_deref().map(|m| m.trim().to_ascii_lowercase()) {
            None => Ok(SyncMode::Incremental),
            Some(m) if m == "incremental" || m.is_empty() => Ok(SyncMode::Incremental),
            Some(m) if m == "bulk" => Ok(SyncMode::Bulk),
            Some(other) => Err(format!("Invalid value for 'mode': {other}")),
        }
    }
}

pub fn router(runner: Arc<SyncRunner>) -> Router {
    Router::new()
        .route("/api/sync", get(sync_handler).post(sync_handler))
        .route("/health", get(health_handler))
        .with_state(runner)
}

pub async fn serve(
    runner: Arc<SyncRunner>,
    addr: SocketAddr,
    cancel: CancellationToken,
) -> Result<(), RuntimeError> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, runner, cancel).await
}

/// Serves the trigger endpoints on an already bound listener until `cancel`
/// fires.
pub async fn serve_on(
    listener: TcpListener,
    runner: Arc<SyncRunner>,
    cancel: CancellationToken,
) -> Result<(), RuntimeError> {
    info!(addr = %listener.local_addr()?, "Trigger server listening");

    axum::serve(listener, router(runner))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Trigger server stopped");
    Ok(())
}

async fn sync_handler(
    State(runner): State<Arc<SyncRunner>>,
    Query(params): Query<SyncParams>,
) -> Response {
    let mode = match params.sync_mode() {
        Ok(mode) => mode,
        Err(msg) => return (StatusCode::BAD_REQUEST, msg).into_response(),
    };

    info!(%mode, "Sync triggered over HTTP");
    match runner.run(mode).await {
        Ok(summary) => (StatusCode::OK, summary.to_string()).into_response(),
        Err(err) => {
            error!(%mode, %err, "Triggered sync failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Sync failed: {err}")).into_response()
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}
