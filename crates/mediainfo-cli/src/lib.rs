//! End-to-end driver for a deployed MediaInfo AME service.
//!
//! Uploads a media file, submits an `ExtractTechnicalMetadata` job through the
//! job service and waits for it to reach a terminal status.

pub mod deployment;
pub mod job;
pub mod upload;

pub use deployment::DeploymentOutputs;
pub use job::{start_job, test_job, wait_for_job_completion, TEST_TRACKER_LABEL};
pub use upload::{content_type_for, upload_file_if_absent, MEDIA_URL_EXPIRY};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
