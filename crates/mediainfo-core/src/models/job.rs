use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::ParameterError;

/// Type tag of jobs handled by this service.
pub const AME_JOB_TYPE: &str = "AmeJob";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobStatus {
    New,
    Pending,
    Assigned,
    Queued,
    Scheduled,
    Running,
    Completed,
    Failed,
    Canceled,
}

impl JobStatus {
    /// Completed, failed and canceled jobs never change status again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Canceled
        )
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            JobStatus::New => write!(f, "New"),
            JobStatus::Pending => write!(f, "Pending"),
            JobStatus::Assigned => write!(f, "Assigned"),
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Scheduled => write!(f, "Scheduled"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed => write!(f, "Failed"),
            JobStatus::Canceled => write!(f, "Canceled"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(JobStatus::New),
            "pending" => Ok(JobStatus::Pending),
            "assigned" => Ok(JobStatus::Assigned),
            "queued" => Ok(JobStatus::Queued),
            "scheduled" => Ok(JobStatus::Scheduled),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            "canceled" | "cancelled" => Ok(JobStatus::Canceled),
            _ => Err(anyhow::anyhow!("Invalid job status: {}", s)),
        }
    }
}

/// String-keyed bag of job parameters with typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobParameterBag(serde_json::Map<String, serde_json::Value>);

impl JobParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a parameter as `T`. A missing or `null` parameter is `Ok(None)`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ParameterError> {
        match self.0.get(name) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| ParameterError::InvalidValue {
                    name: name.to_string(),
                    source,
                }),
        }
    }

    /// Set a parameter, replacing any previous value.
    pub fn set<T: Serialize>(&mut self, name: &str, value: &T) -> Result<(), ParameterError> {
        let value = serde_json::to_value(value).map_err(|source| ParameterError::InvalidValue {
            name: name.to_string(),
            source,
        })?;
        self.0.insert(name.to_string(), value);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Failure report attached to a failed job or job assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetail {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Correlation id carried from the job creator through every worker log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "@type", default = "default_job_type")]
    pub job_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub job_profile_id: String,
    #[serde(default)]
    pub job_input: JobParameterBag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_output: Option<JobParameterBag>,
    #[serde(default = "default_job_status")]
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProblemDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<Tracker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
}

fn default_job_type() -> String {
    AME_JOB_TYPE.to_string()
}

fn default_job_status() -> JobStatus {
    JobStatus::New
}

impl Job {
    /// New AME job for the given profile, not yet submitted.
    pub fn new_ame(
        job_profile_id: impl Into<String>,
        job_input: JobParameterBag,
        tracker: Option<Tracker>,
    ) -> Self {
        Self {
            job_type: default_job_type(),
            id: None,
            job_profile_id: job_profile_id.into(),
            job_input,
            job_output: None,
            status: JobStatus::New,
            error: None,
            tracker,
            date_created: None,
            date_modified: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAssignment {
    pub id: String,
    pub job_id: String,
    #[serde(default = "default_job_status")]
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_output: Option<JobParameterBag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProblemDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<Tracker>,
}

/// Body of a job assignment status update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAssignmentUpdate {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_output: Option<JobParameterBag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProblemDetail>,
}
