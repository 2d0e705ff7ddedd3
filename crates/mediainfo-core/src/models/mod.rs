//! Data models for the job service and the worker
//!
//! Wire types exchanged with the job-orchestration service, serialized in the
//! camelCase JSON shape the service speaks.

mod job;
mod locator;
mod worker_request;

// Re-export all models for convenient imports
pub use job::{
    Job, JobAssignment, JobAssignmentUpdate, JobParameterBag, JobProfile, JobStatus,
    ProblemDetail, Tracker,
};
pub use locator::Locator;
pub use worker_request::{ProcessJobAssignmentInput, WorkerRequest};
