mod helpers;

use std::sync::Arc;

use helpers::*;
use mediainfo_api_client::{ApiClient, Auth};
use mediainfo_core::WorkerRequest;
use mediainfo_worker::Worker;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;

fn process_request(job_assignment_id: &str) -> WorkerRequest {
    serde_json::from_value(json!({
        "operationName": "ProcessJobAssignment",
        "input": {"jobAssignmentId": job_assignment_id},
        "tracker": {"id": "t-1", "label": "Test - TestWorkflow"}
    }))
    .unwrap()
}

async fn mock_json(
    server: &mut ServerGuard,
    method: &str,
    path: &str,
    body: serde_json::Value,
) -> Mock {
    server
        .mock(method, path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// Assignment ja-1 of job /jobs/1 for the given profile.
async fn mock_lookup(server: &mut ServerGuard, profile_name: &str) -> Vec<Mock> {
    vec![
        mock_json(
            server,
            "GET",
            "/job-assignments/ja-1",
            json!({"id": "ja-1", "jobId": "/jobs/1", "status": "Scheduled"}),
        )
        .await,
        mock_json(
            server,
            "GET",
            "/jobs/1",
            json!({
                "@type": "AmeJob",
                "id": "/jobs/1",
                "jobProfileId": "/job-profiles/p-1",
                "jobInput": {"inputFile": {"url": MEDIA_URL}},
                "status": "Scheduled"
            }),
        )
        .await,
        mock_json(
            server,
            "GET",
            "/job-profiles/p-1",
            json!({"id": "/job-profiles/p-1", "name": profile_name}),
        )
        .await,
    ]
}

async fn mock_status_update(
    server: &mut ServerGuard,
    body: serde_json::Value,
    hits: usize,
) -> Mock {
    server
        .mock("PATCH", "/job-assignments/ja-1")
        .match_body(Matcher::PartialJson(body))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"ja-1","jobId":"/jobs/1","status":"Running"}"#)
        .expect(hits)
        .create_async()
        .await
}

async fn worker(
    server: &ServerGuard,
    extractor: Arc<FakeExtractor>,
) -> (tempfile::TempDir, Worker) {
    let (dir, storage) = local_storage().await;
    let client = ApiClient::new(server.url(), Auth::None).unwrap();
    let worker = Worker::new(client).register(Arc::new(workflow(extractor, storage, "")));
    (dir, worker)
}

#[tokio::test]
async fn test_process_job_assignment_completes() {
    let mut server = mockito::Server::new_async().await;
    let _lookup = mock_lookup(&mut server, "ExtractTechnicalMetadata").await;
    let running = mock_status_update(&mut server, json!({"status": "Running"}), 1).await;
    let completed = mock_status_update(
        &mut server,
        json!({
            "status": "Completed",
            "jobOutput": {"outputFile": {
                "@type": "S3Locator",
                "key": "2024-01-02T03-04-05/2015_GF_ORF_00_18_09_conv.json",
                "url": "http://localhost:8080/artifacts/2024-01-02T03-04-05/2015_GF_ORF_00_18_09_conv.json"
            }}
        }),
        1,
    )
    .await;
    let failed = mock_status_update(&mut server, json!({"status": "Failed"}), 0).await;

    let (_dir, worker) = worker(&server, FakeExtractor::printing(EBUCORE_JSON)).await;
    assert!(worker.supports_profile("ExtractTechnicalMetadata"));

    worker.handle_request(process_request("ja-1")).await.unwrap();

    running.assert_async().await;
    completed.assert_async().await;
    failed.assert_async().await;
}

#[tokio::test]
async fn test_workflow_failure_patches_failed() {
    let mut server = mockito::Server::new_async().await;
    let _lookup = mock_lookup(&mut server, "ExtractTechnicalMetadata").await;
    let _running = mock_status_update(&mut server, json!({"status": "Running"}), 1).await;
    let completed = mock_status_update(&mut server, json!({"status": "Completed"}), 0).await;
    let failed = mock_status_update(
        &mut server,
        json!({
            "status": "Failed",
            "error": {"type": "uri://mediainfo-ame-service/EXTRACTION_FAILURE"}
        }),
        1,
    )
    .await;

    let (_dir, worker) = worker(&server, FakeExtractor::failing()).await;

    let err = worker
        .handle_request(process_request("ja-1"))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Failed to run media info"));

    completed.assert_async().await;
    failed.assert_async().await;
}

#[tokio::test]
async fn test_unsupported_profile_patches_failed() {
    let mut server = mockito::Server::new_async().await;
    let _lookup = mock_lookup(&mut server, "TranscodeVideo").await;
    let running = mock_status_update(&mut server, json!({"status": "Running"}), 0).await;
    let failed = mock_status_update(
        &mut server,
        json!({
            "status": "Failed",
            "error": {
                "type": "uri://mediainfo-ame-service/WORKER_ERROR",
                "title": "JobProfile 'TranscodeVideo' is not supported"
            }
        }),
        1,
    )
    .await;

    let extractor = FakeExtractor::printing(EBUCORE_JSON);
    let (_dir, worker) = worker(&server, extractor.clone()).await;

    assert!(worker.handle_request(process_request("ja-1")).await.is_err());
    assert_eq!(extractor.calls(), 0);

    running.assert_async().await;
    failed.assert_async().await;
}

#[tokio::test]
async fn test_unsupported_operation_is_rejected() {
    let server = mockito::Server::new_async().await;
    let (_dir, worker) = worker(&server, FakeExtractor::printing(EBUCORE_JSON)).await;

    let request: WorkerRequest = serde_json::from_value(json!({
        "operationName": "RestartJob",
        "input": {}
    }))
    .unwrap();

    let err = worker.handle_request(request).await.unwrap_err();
    assert_eq!(err.to_string(), "Unsupported worker operation 'RestartJob'");
}

#[tokio::test]
async fn test_malformed_input_is_rejected() {
    let server = mockito::Server::new_async().await;
    let (_dir, worker) = worker(&server, FakeExtractor::printing(EBUCORE_JSON)).await;

    let request: WorkerRequest = serde_json::from_value(json!({
        "operationName": "ProcessJobAssignment",
        "input": {"id": "ja-1"}
    }))
    .unwrap();

    assert!(worker.handle_request(request).await.is_err());
}
