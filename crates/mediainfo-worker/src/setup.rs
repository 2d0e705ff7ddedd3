//! Worker setup and initialization

use std::sync::Arc;

use anyhow::{Context, Result};

use mediainfo_api_client::ApiClient;
use mediainfo_core::WorkerConfig;
use mediainfo_processing::MediaInfoExtractor;
use mediainfo_storage::create_storage;

use crate::dispatch::Worker;
use crate::operations::ExtractTechnicalMetadata;

/// Build the worker with every job profile handler registered.
pub async fn initialize_worker(config: &WorkerConfig) -> Result<Worker> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(&config.storage)
        .await
        .context("Failed to initialize artifact storage")?;
    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %config.output_bucket,
        "Storage abstraction initialized successfully"
    );

    let extractor = MediaInfoExtractor::new(
        config.mediainfo_path.clone(),
        config.mediainfo_output_format.clone(),
    )
    .context("Failed to configure mediainfo")?;

    let client = ApiClient::from_config(config)?;

    let extract = ExtractTechnicalMetadata::from_config(config, Arc::new(extractor), storage);

    Ok(Worker::new(client).register(Arc::new(extract)))
}
