//! Telemetry initialization
//!
//! Installs the global `tracing` subscriber. Log export beyond stdout is not
//! part of this service.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry, TelemetryConfig};
