//! Workflow error taxonomy
//!
//! Every step of the extraction workflow is terminal on error. The workflow
//! only returns the error; the dispatcher reports it to the job service.

use mediainfo_core::{ErrorMetadata, LogLevel};
use mediainfo_processing::ExtractionError;
use mediainfo_storage::{KeyError, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error(transparent)]
    ExtractionFailure(#[from] ExtractionError),

    #[error("Failed to run media info: no output")]
    EmptyExtractionOutput,

    #[error(transparent)]
    KeyDerivationFailure(#[from] KeyError),

    #[error("Failed to store extraction artifact: {0}")]
    UploadFailure(#[from] StorageError),

    #[error("Failed to complete job assignment: {0}")]
    CompletionFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl WorkflowError {
    pub fn completion(err: anyhow::Error) -> Self {
        WorkflowError::CompletionFailure(err.into())
    }
}

/// (error_code, is_recoverable, log_level)
fn workflow_error_static_metadata(err: &WorkflowError) -> (&'static str, bool, LogLevel) {
    match err {
        WorkflowError::MissingInput(_) => ("MISSING_INPUT", false, LogLevel::Warn),
        WorkflowError::ExtractionFailure(ExtractionError::InvalidExecutable(_)) => {
            ("EXTRACTION_FAILURE", false, LogLevel::Error)
        }
        WorkflowError::ExtractionFailure(_) => ("EXTRACTION_FAILURE", true, LogLevel::Error),
        WorkflowError::EmptyExtractionOutput => ("EMPTY_EXTRACTION_OUTPUT", false, LogLevel::Warn),
        WorkflowError::KeyDerivationFailure(_) => {
            ("KEY_DERIVATION_FAILURE", false, LogLevel::Warn)
        }
        WorkflowError::UploadFailure(_) => ("UPLOAD_FAILURE", true, LogLevel::Error),
        WorkflowError::CompletionFailure(_) => ("COMPLETION_FAILURE", true, LogLevel::Error),
    }
}

impl ErrorMetadata for WorkflowError {
    fn error_code(&self) -> &'static str {
        workflow_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        workflow_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        workflow_error_static_metadata(self).2
    }
}
