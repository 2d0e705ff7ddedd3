//! `ExtractTechnicalMetadata` job profile.
//!
//! Runs the extractor against the job's `inputFile`, stores the tool output as
//! a JSON artifact, publishes a signed locator as `outputFile` and completes
//! the job assignment. The assignment is completed only after the artifact is
//! stored; any failure leaves it untouched and is returned to the caller.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use mediainfo_core::constants::{
    ARTIFACT_CONTENT_TYPE, ARTIFACT_EXTENSION, EXTRACT_TECHNICAL_METADATA_PROFILE,
    INPUT_FILE_PARAM, OUTPUT_FILE_PARAM,
};
use mediainfo_core::{ErrorMetadata, LogLevel, Locator, WorkerConfig};
use mediainfo_processing::MetadataExtractor;
use mediainfo_storage::{derive_artifact_key_at, Storage};

use crate::context::{JobAssignmentHandle, JobProfileHandler};
use crate::error::WorkflowError;

/// Source of the timestamp bucket in artifact keys.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Start,
    Extracting,
    Deriving,
    Uploading,
    Completing,
    Done,
    Failed,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Start => "start",
            WorkflowState::Extracting => "extracting",
            WorkflowState::Deriving => "deriving",
            WorkflowState::Uploading => "uploading",
            WorkflowState::Completing => "completing",
            WorkflowState::Done => "done",
            WorkflowState::Failed => "failed",
        };
        f.write_str(name)
    }
}

pub struct ExtractTechnicalMetadata {
    extractor: Arc<dyn MetadataExtractor>,
    storage: Arc<dyn Storage>,
    output_prefix: String,
    signed_url_expiry: Duration,
    clock: Clock,
}

impl ExtractTechnicalMetadata {
    pub fn new(
        extractor: Arc<dyn MetadataExtractor>,
        storage: Arc<dyn Storage>,
        output_prefix: impl Into<String>,
        signed_url_expiry: Duration,
    ) -> Self {
        Self {
            extractor,
            storage,
            output_prefix: output_prefix.into(),
            signed_url_expiry,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn from_config(
        config: &WorkerConfig,
        extractor: Arc<dyn MetadataExtractor>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self::new(
            extractor,
            storage,
            config.output_prefix.clone(),
            config.signed_url_expiry,
        )
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Run the workflow once. Returns the locator written to `outputFile`.
    #[tracing::instrument(
        skip(self, assignment),
        fields(job_assignment.id = %assignment.job_assignment_id())
    )]
    pub async fn run(
        &self,
        assignment: &mut dyn JobAssignmentHandle,
    ) -> Result<Locator, WorkflowError> {
        let mut state = WorkflowState::Start;

        match self.execute(assignment, &mut state).await {
            Ok(locator) => {
                transition(&mut state, WorkflowState::Done);
                Ok(locator)
            }
            Err(err) => {
                log_failure(&err, state);
                transition(&mut state, WorkflowState::Failed);
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        assignment: &mut dyn JobAssignmentHandle,
        state: &mut WorkflowState,
    ) -> Result<Locator, WorkflowError> {
        let input = assignment
            .input(INPUT_FILE_PARAM)
            .map_err(|e| WorkflowError::MissingInput(e.to_string()))?;
        let url = input
            .as_ref()
            .and_then(Locator::resolvable_url)
            .ok_or_else(|| {
                WorkflowError::MissingInput(format!(
                    "job parameter '{}' has no url",
                    INPUT_FILE_PARAM
                ))
            })?
            .to_string();

        transition(state, WorkflowState::Extracting);
        let output = self.extractor.extract(&url).await?;
        if !output.has_output() {
            return Err(WorkflowError::EmptyExtractionOutput);
        }

        transition(state, WorkflowState::Deriving);
        let key = format!(
            "{}{}",
            derive_artifact_key_at(&url, &self.output_prefix, (self.clock)())?,
            ARTIFACT_EXTENSION
        );

        transition(state, WorkflowState::Uploading);
        self.storage
            .upload_with_key(&key, output.stdout.into_bytes(), ARTIFACT_CONTENT_TYPE)
            .await?;
        let signed_url = self
            .storage
            .get_presigned_url(&key, self.signed_url_expiry)
            .await?;
        let locator = Locator::for_object(
            self.storage.bucket().map(String::from),
            self.storage.object_key(&key),
            signed_url,
        );

        transition(state, WorkflowState::Completing);
        assignment
            .set_output(OUTPUT_FILE_PARAM, &locator)
            .map_err(WorkflowError::completion)?;
        assignment
            .complete()
            .await
            .map_err(WorkflowError::completion)?;

        tracing::info!(
            key = ?locator.key,
            bucket = ?locator.bucket,
            "Technical metadata stored"
        );

        Ok(locator)
    }
}

fn transition(state: &mut WorkflowState, next: WorkflowState) {
    tracing::debug!(from = %state, to = %next, "Workflow state transition");
    *state = next;
}

fn log_failure(err: &WorkflowError, state: WorkflowState) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %err, error_code = code, state = %state, "Workflow failed")
        }
        LogLevel::Warn => {
            tracing::warn!(error = %err, error_code = code, state = %state, "Workflow failed")
        }
        LogLevel::Error => {
            tracing::error!(error = %err, error_code = code, state = %state, "Workflow failed")
        }
    }
}

#[async_trait]
impl JobProfileHandler for ExtractTechnicalMetadata {
    fn profile_name(&self) -> &str {
        EXTRACT_TECHNICAL_METADATA_PROFILE
    }

    async fn handle(&self, assignment: &mut dyn JobAssignmentHandle) -> anyhow::Result<()> {
        self.run(assignment).await?;
        Ok(())
    }
}
