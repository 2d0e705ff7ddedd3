//! Job assignment handle and job profile handler traits
//!
//! The dispatcher implements [`JobAssignmentHandle`] over the job service;
//! tests implement it in memory. Handlers registered with the dispatcher
//! implement [`JobProfileHandler`] and run against whichever handle they get.

use anyhow::Result;
use async_trait::async_trait;

use mediainfo_core::{Locator, ParameterError};

/// The view a handler has of one job assignment.
#[async_trait]
pub trait JobAssignmentHandle: Send + Sync {
    /// Id of the job assignment, used for logging.
    fn job_assignment_id(&self) -> &str;

    /// Locator stored under a job input parameter. `Ok(None)` when absent.
    fn input(&self, name: &str) -> Result<Option<Locator>, ParameterError>;

    /// Record a locator under a job output parameter.
    fn set_output(&mut self, name: &str, locator: &Locator) -> Result<()>;

    /// Mark the job assignment completed, publishing the output parameters.
    async fn complete(&mut self) -> Result<()>;
}

/// Runs the work for one job profile.
#[async_trait]
pub trait JobProfileHandler: Send + Sync {
    /// Job profile name this handler is registered under.
    fn profile_name(&self) -> &str;

    async fn handle(&self, assignment: &mut dyn JobAssignmentHandle) -> Result<()>;
}
