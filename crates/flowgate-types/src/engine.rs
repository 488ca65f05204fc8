//! Workflow-engine abstraction types.
//!
//! Descriptors returned by the `EngineClient` trait. The concrete engine is
//! the system of record for these -- Flowgate never persists them, only
//! translates the engine's native vocabulary into these shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a workflow as the abstraction layer reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Draft,
    Active,
    Paused,
    Deleted,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStatus::Draft => write!(f, "draft"),
            WorkflowStatus::Active => write!(f, "active"),
            WorkflowStatus::Paused => write!(f, "paused"),
            WorkflowStatus::Deleted => write!(f, "deleted"),
        }
    }
}

impl FromStr for WorkflowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(WorkflowStatus::Draft),
            "active" => Ok(WorkflowStatus::Active),
            "paused" => Ok(WorkflowStatus::Paused),
            "deleted" => Ok(WorkflowStatus::Deleted),
            other => Err(format!("invalid workflow status: '{other}'")),
        }
    }
}

/// State of one workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Timeout,
    Paused,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::Pending => write!(f, "pending"),
            ExecutionStatus::Running => write!(f, "running"),
            ExecutionStatus::Succeeded => write!(f, "succeeded"),
            ExecutionStatus::Failed => write!(f, "failed"),
            ExecutionStatus::Timeout => write!(f, "timeout"),
            ExecutionStatus::Paused => write!(f, "paused"),
        }
    }
}

/// A workflow as seen through the abstraction layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDescriptor {
    /// Engine-assigned identifier (opaque to Flowgate).
    pub id: String,
    pub name: String,
    pub status: WorkflowStatus,
    /// The engine project that owns this workflow.
    pub project_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

/// One execution of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionDescriptor {
    pub id: String,
    pub workflow_id: String,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Wall-clock duration in milliseconds, when the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request to create a workflow in the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkflow {
    pub name: String,
    pub project_id: String,
    /// Optional engine-native trigger configuration, passed through opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

/// One page of workflow listings. `next_cursor` is the engine's opaque
/// pagination token; `None` means the listing is exhausted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowPage {
    pub items: Vec<WorkflowDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// One page of execution listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPage {
    pub items: Vec<ExecutionDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_status_roundtrip() {
        for status in [
            WorkflowStatus::Draft,
            WorkflowStatus::Active,
            WorkflowStatus::Paused,
            WorkflowStatus::Deleted,
        ] {
            assert_eq!(
                status.to_string().parse::<WorkflowStatus>().unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_workflow_status_rejects_unknown() {
        assert!("enabled".parse::<WorkflowStatus>().is_err());
    }

    #[test]
    fn test_execution_serializes_lowercase() {
        let json = serde_json::to_value(ExecutionStatus::Succeeded).unwrap();
        assert_eq!(json, serde_json::json!("succeeded"));
    }

    #[test]
    fn test_descriptor_omits_empty_optionals() {
        let descriptor = WorkflowDescriptor {
            id: "wf-1".to_string(),
            name: "Demo".to_string(),
            status: WorkflowStatus::Draft,
            project_id: "proj-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            folder_id: None,
        };
        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(!json.contains("folder_id"));
    }
}
