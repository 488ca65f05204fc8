//! Engine wire types and status vocabulary mapping.
//!
//! The engine's REST API speaks its own shapes and SCREAMING_CASE status
//! vocabulary. These DTOs stay private to the adapter; everything leaving
//! this module is a descriptor from `flowgate-types`.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use flowgate_types::engine::{
    ExecutionDescriptor, ExecutionStatus, WorkflowDescriptor, WorkflowStatus,
};

/// Engine flow record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FlowDto {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    pub status: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub version: FlowVersionDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FlowVersionDto {
    pub display_name: String,
}

/// Engine flow-run record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FlowRunDto {
    pub id: String,
    pub flow_id: String,
    pub status: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub finish_time: Option<DateTime<Utc>>,
    /// Milliseconds, when the run has finished.
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Engine cursor-paged listing envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct SeekPage<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Map the engine's flow status onto the abstraction vocabulary.
///
/// Unknown statuses fall back to `Draft` rather than erroring, so an
/// engine upgrade that adds a status cannot break listings.
pub(crate) fn map_workflow_status(raw: &str) -> WorkflowStatus {
    match raw {
        "ENABLED" => WorkflowStatus::Active,
        "DISABLED" => WorkflowStatus::Paused,
        "DRAFT" => WorkflowStatus::Draft,
        "ARCHIVED" | "DELETED" => WorkflowStatus::Deleted,
        other => {
            tracing::debug!(status = other, "unknown engine workflow status, treating as draft");
            WorkflowStatus::Draft
        }
    }
}

/// The engine-native status to request for a desired workflow status.
pub(crate) fn workflow_status_to_engine(status: WorkflowStatus) -> &'static str {
    match status {
        WorkflowStatus::Active => "ENABLED",
        _ => "DISABLED",
    }
}

/// Map the engine's run status onto the abstraction vocabulary.
/// Unknown statuses fall back to `Pending`.
pub(crate) fn map_execution_status(raw: &str) -> ExecutionStatus {
    match raw {
        "QUEUED" => ExecutionStatus::Pending,
        "RUNNING" => ExecutionStatus::Running,
        "SUCCEEDED" => ExecutionStatus::Succeeded,
        "FAILED" | "INTERNAL_ERROR" | "QUOTA_EXCEEDED" => ExecutionStatus::Failed,
        "TIMEOUT" => ExecutionStatus::Timeout,
        "PAUSED" => ExecutionStatus::Paused,
        other => {
            tracing::debug!(status = other, "unknown engine run status, treating as pending");
            ExecutionStatus::Pending
        }
    }
}

impl FlowDto {
    pub(crate) fn into_descriptor(self) -> WorkflowDescriptor {
        WorkflowDescriptor {
            id: self.id,
            name: self.version.display_name,
            status: map_workflow_status(&self.status),
            project_id: self.project_id,
            created_at: self.created,
            updated_at: self.updated,
            folder_id: self.folder_id,
        }
    }
}

impl FlowRunDto {
    pub(crate) fn into_descriptor(self) -> ExecutionDescriptor {
        ExecutionDescriptor {
            id: self.id,
            workflow_id: self.flow_id,
            status: map_execution_status(&self.status),
            started_at: self.start_time,
            finished_at: self.finish_time,
            duration_ms: self.duration,
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_status_mapping() {
        assert_eq!(map_workflow_status("ENABLED"), WorkflowStatus::Active);
        assert_eq!(map_workflow_status("DISABLED"), WorkflowStatus::Paused);
        assert_eq!(map_workflow_status("ARCHIVED"), WorkflowStatus::Deleted);
    }

    #[test]
    fn test_unknown_workflow_status_falls_back_to_draft() {
        assert_eq!(map_workflow_status("SHINY_NEW_STATE"), WorkflowStatus::Draft);
        assert_eq!(map_workflow_status(""), WorkflowStatus::Draft);
    }

    #[test]
    fn test_execution_status_mapping() {
        assert_eq!(map_execution_status("RUNNING"), ExecutionStatus::Running);
        assert_eq!(map_execution_status("SUCCEEDED"), ExecutionStatus::Succeeded);
        assert_eq!(map_execution_status("INTERNAL_ERROR"), ExecutionStatus::Failed);
        assert_eq!(map_execution_status("TIMEOUT"), ExecutionStatus::Timeout);
    }

    #[test]
    fn test_unknown_execution_status_falls_back_to_pending() {
        assert_eq!(map_execution_status("WAITING_FOR_GODOT"), ExecutionStatus::Pending);
    }

    #[test]
    fn test_status_write_mapping_only_active_enables() {
        assert_eq!(workflow_status_to_engine(WorkflowStatus::Active), "ENABLED");
        assert_eq!(workflow_status_to_engine(WorkflowStatus::Paused), "DISABLED");
        assert_eq!(workflow_status_to_engine(WorkflowStatus::Draft), "DISABLED");
    }

    #[test]
    fn test_flow_dto_parses_engine_shape() {
        let json = r#"{
            "id": "flow-1",
            "projectId": "proj-1",
            "folderId": null,
            "status": "ENABLED",
            "created": "2026-01-01T00:00:00Z",
            "updated": "2026-01-02T00:00:00Z",
            "version": { "displayName": "Nightly sync" }
        }"#;
        let dto: FlowDto = serde_json::from_str(json).unwrap();
        let descriptor = dto.into_descriptor();
        assert_eq!(descriptor.id, "flow-1");
        assert_eq!(descriptor.name, "Nightly sync");
        assert_eq!(descriptor.status, WorkflowStatus::Active);
    }

    #[test]
    fn test_seek_page_parses_cursor() {
        let json = r#"{ "data": [], "next": "cur-2" }"#;
        let page: SeekPage<FlowDto> = serde_json::from_str(json).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.next.as_deref(), Some("cur-2"));
    }
}
