//! Worker request dispatch
//!
//! A `ProcessJobAssignment` request is resolved to its job assignment, job and
//! job profile, then handed to the handler registered under the profile name.
//! Any failure on the way is reported to the job service by patching the
//! assignment to `Failed` with a problem detail, and then returned.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use mediainfo_api_client::ApiClient;
use mediainfo_core::constants::PROCESS_JOB_ASSIGNMENT_OPERATION;
use mediainfo_core::models::{JobAssignmentUpdate, ProcessJobAssignmentInput};
use mediainfo_core::{ErrorMetadata, JobStatus, ProblemDetail, WorkerRequest};

use crate::context::JobProfileHandler;
use crate::error::WorkflowError;
use crate::handle::RemoteJobAssignment;

/// Prefix of the `type` of problem details reported by this worker.
pub const PROBLEM_TYPE_PREFIX: &str = "uri://mediainfo-ame-service/";

/// Error code for failures outside the extraction workflow.
const WORKER_ERROR_CODE: &str = "WORKER_ERROR";

pub struct Worker {
    client: ApiClient,
    handlers: HashMap<String, Arc<dyn JobProfileHandler>>,
}

impl Worker {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            handlers: HashMap::new(),
        }
    }

    /// Register a handler under its profile name, replacing any previous one.
    pub fn register(mut self, handler: Arc<dyn JobProfileHandler>) -> Self {
        self.handlers
            .insert(handler.profile_name().to_string(), handler);
        self
    }

    pub fn supports_profile(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            operation = %request.operation_name,
            tracker.id = request.tracker.as_ref().map(|t| t.id.as_str()).unwrap_or(""),
            tracker.label = request.tracker.as_ref().map(|t| t.label.as_str()).unwrap_or("")
        )
    )]
    pub async fn handle_request(&self, request: WorkerRequest) -> Result<()> {
        let start = std::time::Instant::now();
        tracing::info!("Worker function start");

        let result = match request.operation_name.as_str() {
            PROCESS_JOB_ASSIGNMENT_OPERATION => {
                match serde_json::from_value::<ProcessJobAssignmentInput>(request.input) {
                    Ok(input) => self.process_job_assignment(&input.job_assignment_id).await,
                    Err(e) => Err(anyhow::Error::new(e)
                        .context("Invalid input for ProcessJobAssignment operation")),
                }
            }
            other => Err(anyhow!("Unsupported worker operation '{}'", other)),
        };

        tracing::info!(
            success = result.is_ok(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Worker function end"
        );
        result
    }

    /// Process one job assignment, reporting failure to the job service.
    pub async fn process_job_assignment(&self, job_assignment_id: &str) -> Result<()> {
        match self.run_job_assignment(job_assignment_id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.report_failure(job_assignment_id, &err).await;
                Err(err)
            }
        }
    }

    async fn run_job_assignment(&self, job_assignment_id: &str) -> Result<()> {
        let assignment = self.client.get_job_assignment(job_assignment_id).await?;
        let job = self.client.get_job(&assignment.job_id).await?;
        let profile = self.client.get_job_profile(&job.job_profile_id).await?;

        let handler = self
            .handlers
            .get(&profile.name)
            .with_context(|| format!("JobProfile '{}' is not supported", profile.name))?;

        tracing::info!(
            job_assignment.id = %job_assignment_id,
            job.id = ?job.id,
            job_profile.name = %profile.name,
            "Processing job assignment"
        );

        self.client
            .update_job_assignment(
                job_assignment_id,
                &JobAssignmentUpdate {
                    status: JobStatus::Running,
                    job_output: None,
                    error: None,
                },
            )
            .await?;

        let mut handle = RemoteJobAssignment::new(self.client.clone(), job_assignment_id, &job);
        handler.handle(&mut handle).await
    }

    async fn report_failure(&self, job_assignment_id: &str, err: &anyhow::Error) {
        let problem = problem_detail(err);
        tracing::error!(
            job_assignment.id = %job_assignment_id,
            error = %err,
            problem_type = %problem.problem_type,
            "Job assignment failed"
        );

        let update = JobAssignmentUpdate {
            status: JobStatus::Failed,
            job_output: None,
            error: Some(problem),
        };
        if let Err(e) = self
            .client
            .update_job_assignment(job_assignment_id, &update)
            .await
        {
            tracing::error!(
                job_assignment.id = %job_assignment_id,
                error = %e,
                "Failed to report job assignment failure"
            );
        }
    }
}

/// Problem detail describing a failed job assignment.
pub fn problem_detail(err: &anyhow::Error) -> ProblemDetail {
    let code = err
        .downcast_ref::<WorkflowError>()
        .map(|e| e.error_code())
        .unwrap_or(WORKER_ERROR_CODE);

    ProblemDetail {
        problem_type: format!("{}{}", PROBLEM_TYPE_PREFIX, code),
        title: err.to_string(),
        detail: Some(format!("{:#}", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_errors_keep_their_code() {
        let err: anyhow::Error = WorkflowError::EmptyExtractionOutput.into();
        let problem = problem_detail(&err);
        assert_eq!(
            problem.problem_type,
            "uri://mediainfo-ame-service/EMPTY_EXTRACTION_OUTPUT"
        );
        assert_eq!(problem.title, "Failed to run media info: no output");
    }

    #[test]
    fn other_errors_are_worker_errors() {
        let err = anyhow!("connection refused").context("Failed to get job 1");
        let problem = problem_detail(&err);
        assert_eq!(problem.problem_type, "uri://mediainfo-ame-service/WORKER_ERROR");
        assert_eq!(problem.title, "Failed to get job 1");
        assert_eq!(
            problem.detail.as_deref(),
            Some("Failed to get job 1: connection refused")
        );
    }
}
