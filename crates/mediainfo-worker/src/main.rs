use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncReadExt;

use mediainfo_core::{WorkerConfig, WorkerRequest};
use mediainfo_infra::{init_telemetry, shutdown_telemetry, TelemetryConfig};

/// Process one worker request against the job service.
#[derive(Parser)]
#[command(name = "mediainfo-worker")]
#[command(version, about)]
struct Cli {
    /// File holding the worker request JSON; read from stdin when omitted
    #[arg(long)]
    request: Option<PathBuf>,
}

async fn read_request(path: Option<&Path>) -> Result<WorkerRequest> {
    let raw = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read worker request {}", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("Failed to read worker request from stdin")?;
            raw
        }
    };

    serde_json::from_str(&raw).context("Failed to parse worker request")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = WorkerConfig::from_env()?;

    init_telemetry(
        &TelemetryConfig::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            .with_environment(config.environment.clone())
            .with_json(config.log_json),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    let request = read_request(cli.request.as_deref()).await?;
    let worker = mediainfo_worker::setup::initialize_worker(&config).await?;

    let result = worker.handle_request(request).await;

    shutdown_telemetry().await;
    result
}
