//! Error types module
//!
//! Shared error classification used by the worker when it logs and reports
//! failures, plus the error raised by typed access to job parameter bags.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error should be reported to the job service and the logs.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "EXTRACTION_FAILURE")
    fn error_code(&self) -> &'static str;

    /// Whether running the same job again could succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Typed access to a job parameter failed.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("Invalid value for job parameter '{name}': {source}")]
    InvalidValue {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}
