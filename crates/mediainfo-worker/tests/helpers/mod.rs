#![allow(dead_code)]

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use tokio::io::{AsyncRead, AsyncReadExt};

use mediainfo_core::{JobParameterBag, Locator, ParameterError};
use mediainfo_processing::{ExtractionError, ExtractionOutput, MetadataExtractor};
use mediainfo_core::StorageBackend;
use mediainfo_storage::{LocalStorage, Storage, StorageError, StorageResult};
use mediainfo_worker::operations::Clock;
use mediainfo_worker::{ExtractTechnicalMetadata, JobAssignmentHandle};

pub const BASE_URL: &str = "http://localhost:8080/artifacts";

pub const MEDIA_URL: &str =
    "https://bucket.s3.amazonaws.com/media/2015_GF_ORF_00_18_09_conv.mp4";

pub const EBUCORE_JSON: &str = r#"{"ebuCoreMain":{"coreMetadata":[{"format":[]}]}}"#;

/// Extractor answering every call with a fixed result.
pub struct FakeExtractor {
    stdout: Option<String>,
    calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn printing(stdout: &str) -> Arc<Self> {
        Arc::new(Self {
            stdout: Some(stdout.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            stdout: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataExtractor for FakeExtractor {
    async fn extract(&self, _url: &str) -> Result<ExtractionOutput, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.stdout {
            Some(stdout) => Ok(ExtractionOutput {
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            None => Err(ExtractionError::NonZeroExit {
                status: "exit status: 1".to_string(),
                stderr: "Unable to open file".to_string(),
            }),
        }
    }
}

/// In-memory job assignment.
pub struct FakeAssignment {
    pub job_input: JobParameterBag,
    pub job_output: JobParameterBag,
    pub complete_calls: usize,
    pub fail_complete: bool,
}

impl FakeAssignment {
    pub fn with_input_url(url: &str) -> Self {
        let mut job_input = JobParameterBag::new();
        job_input.set("inputFile", &Locator::from_url(url)).unwrap();
        Self::with_input(job_input)
    }

    pub fn with_input(job_input: JobParameterBag) -> Self {
        Self {
            job_input,
            job_output: JobParameterBag::new(),
            complete_calls: 0,
            fail_complete: false,
        }
    }

    pub fn output_file(&self) -> Option<Locator> {
        self.job_output.get("outputFile").unwrap()
    }
}

#[async_trait]
impl JobAssignmentHandle for FakeAssignment {
    fn job_assignment_id(&self) -> &str {
        "ja-test"
    }

    fn input(&self, name: &str) -> Result<Option<Locator>, ParameterError> {
        self.job_input.get(name)
    }

    fn set_output(&mut self, name: &str, locator: &Locator) -> anyhow::Result<()> {
        self.job_output.set(name, locator)?;
        Ok(())
    }

    async fn complete(&mut self) -> anyhow::Result<()> {
        if self.fail_complete {
            return Err(anyhow!("job service unavailable"));
        }
        self.complete_calls += 1;
        Ok(())
    }
}

/// In-memory bucket that escapes `%`, `[` and `]` in object names the way
/// S3 object paths do, with switchable upload and signing failures.
#[derive(Default)]
pub struct FakeStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    pub fail_upload: bool,
    pub fail_presign: bool,
}

impl FakeStorage {
    pub fn failing_upload() -> Arc<Self> {
        Arc::new(Self {
            fail_upload: true,
            ..Self::default()
        })
    }

    pub fn failing_presign() -> Arc<Self> {
        Arc::new(Self {
            fail_presign: true,
            ..Self::default()
        })
    }

    pub fn object_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.objects.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    fn url(&self, name: &str) -> String {
        format!("https://artifacts.s3.eu-west-1.amazonaws.com/{}", name)
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        if self.fail_upload {
            return Err(StorageError::UploadFailed("bucket unavailable".to_string()));
        }
        let name = self.object_key(storage_key);
        let url = self.url(&name);
        self.objects.lock().unwrap().insert(name, data);
        Ok(url)
    }

    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        _content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;
        self.upload_with_key(storage_key, data, content_type).await
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&self.object_key(storage_key))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        if self.fail_presign {
            return Err(StorageError::BackendError("signing key expired".to_string()));
        }
        Ok(format!(
            "{}?X-Amz-Signature=abc",
            self.url(&self.object_key(storage_key))
        ))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .contains_key(&self.object_key(storage_key)))
    }

    fn object_key(&self, storage_key: &str) -> String {
        storage_key
            .replace('%', "%25")
            .replace('[', "%5B")
            .replace(']', "%5D")
    }

    fn bucket(&self) -> Option<&str> {
        Some("artifacts")
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// 2024-01-02T03:04:05Z
pub fn fixed_clock() -> Clock {
    Arc::new(|| Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
}

pub async fn local_storage() -> (TempDir, Arc<LocalStorage>) {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path(), BASE_URL.to_string())
        .await
        .unwrap();
    (dir, Arc::new(storage))
}

pub fn workflow(
    extractor: Arc<FakeExtractor>,
    storage: Arc<dyn Storage>,
    prefix: &str,
) -> ExtractTechnicalMetadata {
    ExtractTechnicalMetadata::new(extractor, storage, prefix, Duration::from_secs(12 * 3600))
        .with_clock(fixed_clock())
}
