//! Names shared between the worker, the job service and the test driver.

/// Job profile handled by this service.
pub const EXTRACT_TECHNICAL_METADATA_PROFILE: &str = "ExtractTechnicalMetadata";

/// Job input parameter holding the media locator.
pub const INPUT_FILE_PARAM: &str = "inputFile";

/// Job output parameter receiving the artifact locator.
pub const OUTPUT_FILE_PARAM: &str = "outputFile";

/// Worker operation that processes one job assignment.
pub const PROCESS_JOB_ASSIGNMENT_OPERATION: &str = "ProcessJobAssignment";

/// Extension appended to every derived artifact key.
pub const ARTIFACT_EXTENSION: &str = ".json";

/// Content type of the uploaded extraction artifact.
pub const ARTIFACT_CONTENT_TYPE: &str = "application/json";
