//! Job profile handlers

pub mod extract_technical_metadata;

pub use extract_technical_metadata::{Clock, ExtractTechnicalMetadata, WorkflowState};
