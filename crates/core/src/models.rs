use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::InputError;

/// Key under which the correlation marker is embedded in the dispatch
/// payload. The triggered workflow is expected to surface the same value
/// verbatim as a step name, e.g.
/// `- name: ${{ github.event.client_payload.sha }}`.
pub const MARKER_KEY: &str = "sha";

/// Body of a `repository_dispatch` creation request.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRequest {
    pub event_type: String,
    pub client_payload: Map<String, Value>,
}

impl DispatchRequest {
    /// Build the request payload. Caller-supplied payload fields are merged
    /// in first; the marker always wins a key collision. The dispatch
    /// endpoint itself takes no ref parameter, so a target ref rides along
    /// inside the payload under `"ref"`.
    pub fn new(
        event_type: &str,
        marker: &str,
        extra_payload: Option<&str>,
        git_ref: Option<&str>,
    ) -> Result<Self, InputError> {
        let mut client_payload = match extra_payload {
            Some(raw) => match serde_json::from_str(raw).map_err(InputError::Payload)? {
                Value::Object(map) => map,
                other => return Err(InputError::PayloadNotObject(json_type(&other))),
            },
            None => Map::new(),
        };
        if let Some(git_ref) = git_ref {
            client_payload.insert("ref".to_string(), Value::String(git_ref.to_string()));
        }
        client_payload.insert(MARKER_KEY.to_string(), Value::String(marker.to_string()));
        Ok(Self { event_type: event_type.to_string(), client_payload })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Lifecycle state of a workflow run. The provider occasionally reports
/// states outside the documented three (`waiting`, `pending`, ...); anything
/// unrecognized is non-terminal as far as the poller is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    Completed,
    #[serde(other)]
    Other,
}

/// Terminal conclusion of a completed run. Set exactly once, at the
/// transition into `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    #[serde(other)]
    Unknown,
}

impl Conclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Neutral => "neutral",
            Conclusion::Cancelled => "cancelled",
            Conclusion::Skipped => "skipped",
            Conclusion::TimedOut => "timed_out",
            Conclusion::ActionRequired => "action_required",
            Conclusion::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// The slice of a workflow run the wait loop needs.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
}

/// Envelope of the run listing endpoint, newest first.
#[derive(Debug, Deserialize)]
pub struct WorkflowRunList {
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

/// A job within a run. Only used to identify the run that a dispatch event
/// produced; never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub name: String,
}

/// Envelope of the job listing endpoint.
#[derive(Debug, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn payload_carries_marker() {
        let request = DispatchRequest::new("deploy", "abc123", None, None).unwrap();
        assert_eq!(request.event_type, "deploy");
        assert_eq!(request.client_payload.get(MARKER_KEY), Some(&json!("abc123")));
    }

    #[test]
    fn marker_wins_key_collision() {
        let extra = r#"{"sha": "spoofed", "env": "staging"}"#;
        let request = DispatchRequest::new("deploy", "abc123", Some(extra), None).unwrap();
        assert_eq!(request.client_payload.get("sha"), Some(&json!("abc123")));
        assert_eq!(request.client_payload.get("env"), Some(&json!("staging")));
    }

    #[test]
    fn ref_rides_in_payload() {
        let request =
            DispatchRequest::new("deploy", "abc123", Some(r#"{"a": 1}"#), Some("refs/heads/main"))
                .unwrap();
        assert_eq!(request.client_payload.get("ref"), Some(&json!("refs/heads/main")));
        assert_eq!(request.client_payload.get("a"), Some(&json!(1)));
    }

    #[test]
    fn rejects_malformed_payload() {
        assert!(matches!(
            DispatchRequest::new("deploy", "abc123", Some("{not json"), None),
            Err(InputError::Payload(_))
        ));
        assert!(matches!(
            DispatchRequest::new("deploy", "abc123", Some(r#"["a"]"#), None),
            Err(InputError::PayloadNotObject("an array"))
        ));
    }

    #[test]
    fn run_list_deserializes() {
        let body = json!({
            "total_count": 2,
            "workflow_runs": [
                {"id": 42, "status": "completed", "conclusion": "success", "event": "repository_dispatch"},
                {"id": 41, "status": "in_progress", "conclusion": null},
            ]
        });
        let list: WorkflowRunList = serde_json::from_value(body).unwrap();
        assert_eq!(list.workflow_runs.len(), 2);
        assert_eq!(list.workflow_runs[0].id, 42);
        assert_eq!(list.workflow_runs[0].status, RunStatus::Completed);
        assert_eq!(list.workflow_runs[0].conclusion, Some(Conclusion::Success));
        assert_eq!(list.workflow_runs[1].status, RunStatus::InProgress);
        assert_eq!(list.workflow_runs[1].conclusion, None);
    }

    #[test]
    fn job_list_deserializes() {
        let body = json!({
            "jobs": [
                {"id": 7, "name": "build", "steps": [{"name": "checkout", "number": 1}, {"name": "abc123", "number": 2}]},
                {"id": 8, "name": "queued-job"},
            ]
        });
        let list: JobList = serde_json::from_value(body).unwrap();
        assert_eq!(list.jobs[0].steps[1].name, "abc123");
        // Steps may be absent until the job starts.
        assert!(list.jobs[1].steps.is_empty());
    }

    #[test]
    fn tolerates_unknown_enum_values() {
        let run: WorkflowRun =
            serde_json::from_value(json!({"id": 1, "status": "waiting", "conclusion": "stale"}))
                .unwrap();
        assert_eq!(run.status, RunStatus::Other);
        assert_eq!(run.conclusion, Some(Conclusion::Unknown));
    }

    #[test]
    fn conclusion_strings() {
        let cases: &[(&str, Conclusion)] = &[
            ("success", Conclusion::Success),
            ("failure", Conclusion::Failure),
            ("neutral", Conclusion::Neutral),
            ("cancelled", Conclusion::Cancelled),
            ("skipped", Conclusion::Skipped),
            ("timed_out", Conclusion::TimedOut),
            ("action_required", Conclusion::ActionRequired),
        ];
        for &(name, conclusion) in cases {
            let parsed: Conclusion = serde_json::from_value(json!(name)).unwrap();
            assert_eq!(parsed, conclusion);
            assert_eq!(conclusion.to_string(), name);
        }
    }
}
