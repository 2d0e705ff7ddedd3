//! Run one technical metadata extraction against a deployed service.
//!
//! Storage credentials and region come from the environment (`AWS_*`,
//! `S3_REGION`, `STORAGE_BACKEND`, ...). Set SERVICES_API_KEY when the
//! deployment uses bearer or API key auth.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use mediainfo_api_client::{ApiClient, Auth};
use mediainfo_cli::{
    init_tracing, test_job, upload_file_if_absent, DeploymentOutputs, MEDIA_URL_EXPIRY,
};
use mediainfo_core::StorageSettings;
use mediainfo_storage::create_storage;

#[derive(Parser)]
#[command(name = "test-service", about = "End-to-end test of the MediaInfo AME service")]
struct Cli {
    /// Terraform output JSON of the deployment
    #[arg(long, default_value = "deployment/terraform.output.json")]
    deployment_outputs: PathBuf,
    /// Media file to upload and analyse
    #[arg(long)]
    media_file: PathBuf,
    /// Delay between job status polls
    #[arg(long, default_value = "1000")]
    poll_interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    tracing::info!("Starting test service");
    let deployment = DeploymentOutputs::load(&cli.deployment_outputs)?;

    let settings = StorageSettings::from_lookup(deployment.upload_bucket.clone(), |key| {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    })?;
    let storage = create_storage(&settings)
        .await
        .context("Failed to initialize upload storage")?;

    let auth = Auth::from_settings(
        deployment.services_auth_type,
        std::env::var("SERVICES_API_KEY").ok(),
    )?;
    let client = ApiClient::new(deployment.services_url.clone(), auth)?;

    tracing::info!(file = %cli.media_file.display(), "Uploading media file");
    let input_file =
        upload_file_if_absent(storage.as_ref(), &cli.media_file, MEDIA_URL_EXPIRY).await?;

    let job = test_job(
        &client,
        &input_file,
        Duration::from_millis(cli.poll_interval_ms),
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&job)?);
    tracing::info!("Done");
    Ok(())
}
