use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use mediainfo_api_client::ApiClient;
use mediainfo_core::constants::{EXTRACT_TECHNICAL_METADATA_PROFILE, INPUT_FILE_PARAM};
use mediainfo_core::{Job, JobParameterBag, Locator, Tracker};

pub const TEST_TRACKER_LABEL: &str = "Test - TestWorkflow";

/// Submit an `ExtractTechnicalMetadata` job for `input_file`.
pub async fn start_job(client: &ApiClient, input_file: &Locator) -> Result<Job> {
    let profile = client
        .query_job_profiles(EXTRACT_TECHNICAL_METADATA_PROFILE)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            anyhow!(
                "JobProfile '{}' not found",
                EXTRACT_TECHNICAL_METADATA_PROFILE
            )
        })?;
    let profile_id = profile
        .id
        .with_context(|| format!("JobProfile '{}' has no id", profile.name))?;

    let mut job_input = JobParameterBag::new();
    job_input.set(INPUT_FILE_PARAM, input_file)?;

    let tracker = Tracker {
        id: uuid::Uuid::new_v4().to_string(),
        label: TEST_TRACKER_LABEL.to_string(),
    };

    client
        .create_job(&Job::new_ame(profile_id, job_input, Some(tracker)))
        .await
}

/// Poll the job every `poll_interval` until it is completed, failed or canceled.
pub async fn wait_for_job_completion(
    client: &ApiClient,
    mut job: Job,
    poll_interval: Duration,
) -> Result<Job> {
    let id = job
        .id
        .clone()
        .context("Created job has no id")?;

    tracing::info!(job.id = %id, status = %job.status, "Job status");
    while !job.status.is_terminal() {
        tokio::time::sleep(poll_interval).await;
        job = client.get_job(&id).await?;
        tracing::info!(job.id = %id, status = %job.status, "Job status");
    }

    Ok(job)
}

/// Create the job, wait for it to finish and return its final state.
pub async fn test_job(
    client: &ApiClient,
    input_file: &Locator,
    poll_interval: Duration,
) -> Result<Job> {
    tracing::info!("Creating job");
    let job = start_job(client, input_file).await?;
    tracing::info!(job.id = ?job.id, "Job created");

    wait_for_job_completion(client, job, poll_interval).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediainfo_api_client::Auth;
    use mediainfo_core::JobStatus;
    use mockito::Matcher;
    use serde_json::json;

    fn client(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(server.url(), Auth::None).unwrap()
    }

    fn input_file() -> Locator {
        Locator::for_object(
            Some("upload".to_string()),
            "clip.mp4",
            "https://upload.s3.eu-west-1.amazonaws.com/clip.mp4?X-Amz-Signature=abc",
        )
    }

    #[tokio::test]
    async fn missing_profile_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _profiles = server
            .mock("GET", "/job-profiles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let err = start_job(&client(&server), &input_file()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "JobProfile 'ExtractTechnicalMetadata' not found"
        );
    }

    #[tokio::test]
    async fn creates_tracked_job_and_polls_until_terminal() {
        let mut server = mockito::Server::new_async().await;
        let _profiles = server
            .mock("GET", "/job-profiles")
            .match_query(Matcher::UrlEncoded(
                "name".into(),
                "ExtractTechnicalMetadata".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"/job-profiles/p-1","name":"ExtractTechnicalMetadata"}]"#)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/jobs")
            .match_body(Matcher::PartialJson(json!({
                "@type": "AmeJob",
                "jobProfileId": "/job-profiles/p-1",
                "jobInput": {"inputFile": {"bucket": "upload", "key": "clip.mp4"}},
                "tracker": {"label": "Test - TestWorkflow"}
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"/jobs/1","jobProfileId":"/job-profiles/p-1","jobInput":{},"status":"Queued"}"#,
            )
            .create_async()
            .await;
        let poll = server
            .mock("GET", "/jobs/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"/jobs/1","jobProfileId":"/job-profiles/p-1","jobInput":{},"status":"Completed","jobOutput":{"outputFile":{"url":"https://signed"}}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let job = test_job(&client(&server), &input_file(), Duration::from_millis(1))
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        let output: Option<Locator> = job.job_output.unwrap().get("outputFile").unwrap();
        assert_eq!(output.unwrap().url, "https://signed");
        create.assert_async().await;
        poll.assert_async().await;
    }
}
