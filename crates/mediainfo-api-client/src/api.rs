//! Domain methods for the job service client.

use crate::ApiClient;
use anyhow::{Context, Result};
use mediainfo_core::models::{Job, JobAssignment, JobAssignmentUpdate, JobProfile};

const JOB_PROFILES: &str = "/job-profiles";
const JOBS: &str = "/jobs";
const JOB_ASSIGNMENTS: &str = "/job-assignments";

impl ApiClient {
    /// Job profiles whose name matches exactly.
    pub async fn query_job_profiles(&self, name: &str) -> Result<Vec<JobProfile>> {
        self.get(JOB_PROFILES, &[("name", name.to_string())])
            .await
            .with_context(|| format!("Failed to query job profiles named '{}'", name))
    }

    pub async fn get_job_profile(&self, id: &str) -> Result<JobProfile> {
        self.get(&self.resource_url(JOB_PROFILES, id), &[])
            .await
            .with_context(|| format!("Failed to get job profile {}", id))
    }

    /// Submit a new job; the service fills in id, status and timestamps.
    pub async fn create_job(&self, job: &Job) -> Result<Job> {
        self.post_json(JOBS, job)
            .await
            .context("Failed to create job")
    }

    pub async fn get_job(&self, id: &str) -> Result<Job> {
        self.get(&self.resource_url(JOBS, id), &[])
            .await
            .with_context(|| format!("Failed to get job {}", id))
    }

    pub async fn get_job_assignment(&self, id: &str) -> Result<JobAssignment> {
        self.get(&self.resource_url(JOB_ASSIGNMENTS, id), &[])
            .await
            .with_context(|| format!("Failed to get job assignment {}", id))
    }

    pub async fn update_job_assignment(
        &self,
        id: &str,
        update: &JobAssignmentUpdate,
    ) -> Result<JobAssignment> {
        self.patch_json(&self.resource_url(JOB_ASSIGNMENTS, id), update)
            .await
            .with_context(|| {
                format!(
                    "Failed to update job assignment {} to {}",
                    id, update.status
                )
            })
    }
}
