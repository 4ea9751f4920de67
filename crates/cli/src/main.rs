use crate::{
    commands::{Commands, WatermarkCommand},
    error::CliError,
    shutdown::ShutdownCoordinator,
};
use clap::Parser;
use engine_config::{env::EnvManager, settings::SyncSettings};
use engine_core::state::{sled_store::SledWatermarkStore, tracker::WatermarkTracker};
use engine_processing::sync::phase::SyncMode;
use engine_runtime::{
    error::RuntimeError,
    factory::{PostgresSourceFactory, SourceFactory},
    runner::SyncRunner,
    scheduler::SyncScheduler,
    trigger,
};
use model::{core::time, records::watermark::Watermark};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;
mod shutdown;

const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Parser, Debug)]
#[command(
    name = "telesync",
    version,
    about = "Syncs new IoT telemetry rows from Postgres to an HTTP ingestion endpoint"
)]
struct Cli {
    /// .env file loaded on top of the process environment (defaults to
    /// ./.env when present)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.env_file.as_deref())?;

    match cli.command {
        Commands::Serve => serve(settings).await?,
        Commands::Sync { bulk, json } => {
            let mode = if bulk {
                SyncMode::Bulk
            } else {
                SyncMode::Incremental
            };
            let runner = SyncRunner::from_settings(settings);
            let summary = runner.run(mode).await?;
            println!("{}", output::sync_summary(&summary, json)?);
        }
        Commands::Watermark { command } => {
            let tracker = open_tracker(&settings)?;
            match command {
                WatermarkCommand::Show { json } => {
                    let stored = tracker.current().await;
                    let effective = tracker.get().await;
                    println!(
                        "{}",
                        output::watermark(tracker.key(), stored, effective, json)?
                    );
                }
                WatermarkCommand::Set { timestamp } => {
                    let ts = time::parse_utc(&timestamp)
                        .ok_or_else(|| CliError::InvalidTimestamp(timestamp.clone()))?;
                    let watermark = Watermark::new(ts);
                    tracker.reset(Some(watermark)).await?;
                    println!("{}: set to {watermark}", tracker.key());
                }
                WatermarkCommand::Clear => {
                    tracker.reset(None).await?;
                    println!("{}: cleared", tracker.key());
                }
            }
        }
        Commands::TestConn => {
            let database = settings.database()?;
            let table = settings.source_table();
            let source = PostgresSourceFactory.connect(&database, &table).await?;
            let rows = source.count().await?;
            println!(
                "Connected to {}; table '{table}' has {rows} rows",
                database.display_target()
            );
        }
    }

    Ok(())
}

fn load_settings(env_file: Option<&Path>) -> Result<SyncSettings, CliError> {
    let mut env = EnvManager::from_process();
    match env_file {
        Some(path) => env.load_from_file(path)?,
        None if Path::new(DEFAULT_ENV_FILE).is_file() => env.load_from_file(DEFAULT_ENV_FILE)?,
        None => {}
    }
    Ok(SyncSettings::from_env(env))
}

/// Unlike the runner, the watermark commands refuse to work without a
/// store.
fn open_tracker(settings: &SyncSettings) -> Result<WatermarkTracker, CliError> {
    let watermark = settings.watermark()?;
    let store = SledWatermarkStore::open(&watermark.path)?;
    Ok(WatermarkTracker::new(
        Arc::new(store),
        watermark.key,
        watermark.lookback,
    ))
}

async fn serve(settings: SyncSettings) -> Result<(), CliError> {
    let server = settings.server()?;
    let runner = Arc::new(SyncRunner::from_settings(settings));

    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();
    let cancel = shutdown.cancel_token();

    let scheduler = tokio::spawn(
        SyncScheduler::new(runner.clone(), server.interval).run(cancel.clone()),
    );
    let served = trigger::serve(runner, server.http_addr, cancel.clone()).await;

    // Stop the scheduler too if the server ended on its own.
    cancel.cancel();
    scheduler.await.map_err(RuntimeError::from)?;
    served?;

    if shutdown.is_shutdown_requested() {
        info!("Shutdown complete");
    }
    Ok(())
}
