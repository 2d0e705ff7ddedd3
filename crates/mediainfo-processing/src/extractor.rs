//! Technical metadata extraction through the `mediainfo` command line tool.

use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid mediainfo path: {0}")]
    InvalidExecutable(String),

    #[error("Failed to run media info: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to run media info: exited with {status}: {stderr}")]
    NonZeroExit { status: String, stderr: String },

    #[error("Failed to run media info: output is not valid UTF-8")]
    InvalidOutput(#[source] std::string::FromUtf8Error),
}

/// Everything the tool printed during one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ExtractionOutput {
    /// Whether stdout holds usable output text. Whitespace alone is treated
    /// as no output, so the workflow reports it as an empty extraction.
    pub fn has_output(&self) -> bool {
        !self.stdout.trim().is_empty()
    }
}

/// Extracts technical metadata for the media at a URL.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractionOutput, ExtractionError>;
}

/// Reject executable paths with shell metacharacters or traversal.
fn validate_executable_path(path: &str) -> Result<(), ExtractionError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(ExtractionError::InvalidExecutable(path.to_string()));
    }

    if path.contains("..") {
        return Err(ExtractionError::InvalidExecutable(path.to_string()));
    }

    if !path
        .chars()
        .all(|c| c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\')
    {
        return Err(ExtractionError::InvalidExecutable(path.to_string()));
    }

    Ok(())
}

/// Runs `{mediainfo_path} --Output={output_format} {url}` once per call.
#[derive(Debug, Clone)]
pub struct MediaInfoExtractor {
    mediainfo_path: String,
    output_format: String,
}

impl MediaInfoExtractor {
    pub fn new(mediainfo_path: String, output_format: String) -> Result<Self, ExtractionError> {
        validate_executable_path(&mediainfo_path)?;

        Ok(Self {
            mediainfo_path,
            output_format,
        })
    }

    fn args(&self, url: &str) -> [String; 2] {
        [format!("--Output={}", self.output_format), url.to_string()]
    }
}

#[async_trait]
impl MetadataExtractor for MediaInfoExtractor {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "mediainfo",
        process.executable.path = %self.mediainfo_path,
        mediainfo.output_format = %self.output_format
    ))]
    async fn extract(&self, url: &str) -> Result<ExtractionOutput, ExtractionError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.mediainfo_path)
            .args(self.args(url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to execute mediainfo");
                ExtractionError::Spawn(e)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(
                status = %output.status,
                stderr = %stderr,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "mediainfo failed"
            );
            return Err(ExtractionError::NonZeroExit {
                status: output.status.to_string(),
                stderr,
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(ExtractionError::InvalidOutput)?;
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        tracing::info!(
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "mediainfo completed"
        );

        Ok(ExtractionOutput { stdout, stderr })
    }
}
