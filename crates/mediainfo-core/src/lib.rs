//! MediaInfo AME Core Library
//!
//! This crate provides the domain models, error types and configuration shared
//! by the worker, the storage backends and the job service client.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{ServicesAuthType, StorageSettings, WorkerConfig};
pub use error::{ErrorMetadata, LogLevel, ParameterError};
pub use models::{
    Job, JobAssignment, JobParameterBag, JobProfile, JobStatus, Locator, ProblemDetail, Tracker,
    WorkerRequest,
};
pub use storage_types::StorageBackend;
