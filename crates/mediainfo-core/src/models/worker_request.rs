use serde::{Deserialize, Serialize};

use super::Tracker;

/// Request handed to the worker by whatever invokes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRequest {
    pub operation_name: String,
    #[serde(default)]
    pub input: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<Tracker>,
}

/// Input of the `ProcessJobAssignment` operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessJobAssignmentInput {
    pub job_assignment_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_process_job_assignment_request() {
        let request: WorkerRequest = serde_json::from_str(
            r#"{"operationName":"ProcessJobAssignment","input":{"jobAssignmentId":"ja-1"}}"#,
        )
        .unwrap();
        assert_eq!(request.operation_name, "ProcessJobAssignment");
        assert!(request.tracker.is_none());

        let input: ProcessJobAssignmentInput = serde_json::from_value(request.input).unwrap();
        assert_eq!(input.job_assignment_id, "ja-1");
    }
}
