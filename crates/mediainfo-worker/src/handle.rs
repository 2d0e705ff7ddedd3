use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use mediainfo_api_client::ApiClient;
use mediainfo_core::models::JobAssignmentUpdate;
use mediainfo_core::{Job, JobParameterBag, JobStatus, Locator, ParameterError};

use crate::context::JobAssignmentHandle;

/// Job assignment backed by the job service.
///
/// Inputs come from the job fetched at dispatch time. Outputs are buffered
/// locally and sent with the `Completed` status update.
pub struct RemoteJobAssignment {
    client: ApiClient,
    job_assignment_id: String,
    job_input: JobParameterBag,
    job_output: JobParameterBag,
    completed: bool,
}

impl RemoteJobAssignment {
    pub fn new(client: ApiClient, job_assignment_id: impl Into<String>, job: &Job) -> Self {
        Self {
            client,
            job_assignment_id: job_assignment_id.into(),
            job_input: job.job_input.clone(),
            job_output: job.job_output.clone().unwrap_or_default(),
            completed: false,
        }
    }

    pub fn job_output(&self) -> &JobParameterBag {
        &self.job_output
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

#[async_trait]
impl JobAssignmentHandle for RemoteJobAssignment {
    fn job_assignment_id(&self) -> &str {
        &self.job_assignment_id
    }

    fn input(&self, name: &str) -> Result<Option<Locator>, ParameterError> {
        self.job_input.get(name)
    }

    fn set_output(&mut self, name: &str, locator: &Locator) -> Result<()> {
        self.job_output
            .set(name, locator)
            .with_context(|| format!("Failed to set job output '{}'", name))
    }

    async fn complete(&mut self) -> Result<()> {
        if self.completed {
            return Err(anyhow!(
                "Job assignment {} is already completed",
                self.job_assignment_id
            ));
        }

        let update = JobAssignmentUpdate {
            status: JobStatus::Completed,
            job_output: Some(self.job_output.clone()),
            error: None,
        };
        self.client
            .update_job_assignment(&self.job_assignment_id, &update)
            .await?;
        self.completed = true;

        tracing::info!(
            job_assignment.id = %self.job_assignment_id,
            "Job assignment completed"
        );
        Ok(())
    }
}
