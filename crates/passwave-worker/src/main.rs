//! Passwave worker host
//!
//! Reads newline-delimited JSON envelopes on stdin and answers on stdout.
//! Logs go to stderr.

use passwave_core::WorkerConfig;
use passwave_worker::{serve, Worker};
use std::path::PathBuf;
use tokio::io::{stdin, stdout, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| WorkerConfig::default().data_dir.join("config.json"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = WorkerConfig::load(config_path())?;

    // Initialize logging with log compatibility
    tracing_log::LogTracer::init()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Passwave worker...");
    info!("Data directory: {:?}", config.data_dir);

    // The remote API client lives outside this host; intents stay pending
    // until a transport is wired through `TokioEffects`.
    let worker = Worker::new(config, None);

    serve(&worker, BufReader::new(stdin()), stdout()).await?;

    info!("Passwave worker stopped");
    Ok(())
}
