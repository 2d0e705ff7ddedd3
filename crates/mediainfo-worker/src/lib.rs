//! MediaInfo AME worker
//!
//! Resolves job assignments handed to the worker, dispatches them to the
//! handler registered for the job profile and reports the outcome to the job
//! service. The only registered profile is `ExtractTechnicalMetadata`.

pub mod context;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod operations;
pub mod setup;

pub use context::{JobAssignmentHandle, JobProfileHandler};
pub use dispatch::Worker;
pub use error::WorkflowError;
pub use handle::RemoteJobAssignment;
pub use operations::ExtractTechnicalMetadata;
