//! Workflow run log.
//!
//! Append-only NDJSON audit trail of workflow executions (one JSON object per
//! line). Each event carries:
//! - `ts`: RFC3339 timestamp
//! - `action`: what happened (workflow_start, step_complete, ...)
//! - `actor`: the owner string (e.g., `user@HOST`)
//! - `workflow`: the workflow name, when known
//! - `details`: freeform object with action-specific details
//!
//! ```no_run
//! use agentflow::events::{Event, EventAction, EventLog};
//! use serde_json::json;
//!
//! let log = EventLog::new("runs/events.ndjson");
//! let event = Event::new(EventAction::WorkflowStart)
//!     .with_workflow("feature-dev")
//!     .with_details(json!({"task": "Add login"}));
//! log.append(&event)?;
//! # Ok::<(), agentflow::error::FlowError>(())
//! ```

use crate::error::{FlowError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions recorded in the run log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Workflow resolved and about to run its first step.
    WorkflowStart,
    /// A step's agent returned (successfully or not).
    StepComplete,
    /// A step was skipped because its dependencies did not succeed.
    StepSkipped,
    /// A critical step failed and the remaining steps were abandoned.
    WorkflowAborted,
    /// The workflow result was assembled.
    WorkflowComplete,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::WorkflowStart => write!(f, "workflow_start"),
            EventAction::StepComplete => write!(f, "step_complete"),
            EventAction::StepSkipped => write!(f, "step_skipped"),
            EventAction::WorkflowAborted => write!(f, "workflow_aborted"),
            EventAction::WorkflowComplete => write!(f, "workflow_complete"),
        }
    }
}

/// An event record for the run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// Who ran the workflow (e.g., `user@HOST`).
    pub actor: String,

    /// Workflow name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            workflow: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the workflow name for this event.
    pub fn with_workflow(mut self, workflow: impl Into<String>) -> Self {
        self.workflow = Some(workflow.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| FlowError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append-only NDJSON event file.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event as a JSON line, creating the file (and its parent
    /// directory) on first use.
    pub fn append(&self, event: &Event) -> Result<()> {
        let json_line = event.to_ndjson_line()?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                FlowError::UserError(format!(
                    "failed to create event log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                FlowError::UserError(format!(
                    "failed to open event log '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", json_line).map_err(|e| {
            FlowError::UserError(format!(
                "failed to write event to '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Read every event in the log. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<Event>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            FlowError::UserError(format!(
                "failed to read event log '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| {
                    FlowError::UserError(format!(
                        "corrupt event in '{}': {}",
                        self.path.display(),
                        e
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::WorkflowStart);

        assert_eq!(event.action, EventAction::WorkflowStart);
        assert!(!event.actor.is_empty());
        assert!(event.workflow.is_none());
        let age = Utc::now().signed_duration_since(event.ts);
        assert!(age.num_minutes() < 1);
    }

    #[test]
    fn test_event_builders() {
        let event = Event::new(EventAction::StepSkipped)
            .with_workflow("bug-fix")
            .with_details(json!({"agent_type": "test", "missing": ["code"]}));

        assert_eq!(event.workflow.as_deref(), Some("bug-fix"));
        assert_eq!(event.details["agent_type"], "test");
    }

    #[test]
    fn test_ndjson_line_is_single_line() {
        let event = Event::new(EventAction::StepComplete)
            .with_details(json!({"output": "line one\nline two"}));

        let line = event.to_ndjson_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("\"action\":\"step_complete\""));
    }

    #[test]
    fn test_workflow_omitted_when_unset() {
        let line = Event::new(EventAction::WorkflowComplete)
            .to_ndjson_line()
            .unwrap();
        assert!(!line.contains("\"workflow\""));
    }

    #[test]
    fn test_action_display_matches_serde() {
        for action in [
            EventAction::WorkflowStart,
            EventAction::StepComplete,
            EventAction::StepSkipped,
            EventAction::WorkflowAborted,
            EventAction::WorkflowComplete,
        ] {
            let serialized = serde_json::to_string(&action).unwrap();
            assert_eq!(serialized, format!("\"{}\"", action));
        }
    }

    #[test]
    fn test_append_creates_file_and_parent() {
        let temp_dir = TempDir::new().unwrap();
        let log = EventLog::new(temp_dir.path().join("runs").join("events.ndjson"));

        log.append(&Event::new(EventAction::WorkflowStart).with_workflow("refactor"))
            .unwrap();
        log.append(&Event::new(EventAction::WorkflowComplete).with_workflow("refactor"))
            .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with('\n'));

        let events = log.read_all().unwrap();
        assert_eq!(events[0].action, EventAction::WorkflowStart);
        assert_eq!(events[1].action, EventAction::WorkflowComplete);
    }

    #[test]
    fn test_read_all_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let log = EventLog::new(temp_dir.path().join("none.ndjson"));
        assert!(log.read_all().unwrap().is_empty());
    }
}
