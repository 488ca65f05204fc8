//! EngineClient trait definition.
//!
//! The abstraction boundary between Flowgate and whatever workflow engine
//! is embedded behind it. Application code programs against this trait;
//! swapping engines means writing one new adapter in flowgate-infra.

use flowgate_types::engine::{
    ExecutionDescriptor, ExecutionPage, NewWorkflow, WorkflowDescriptor, WorkflowPage,
    WorkflowStatus,
};
use flowgate_types::error::EngineError;

/// The operations every engine adapter must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOperation {
    CreateWorkflow,
    GetWorkflow,
    ListWorkflows,
    UpdateWorkflowStatus,
    DeleteWorkflow,
    ExecuteWorkflow,
    GetExecutionStatus,
    ListExecutions,
}

impl EngineOperation {
    pub const ALL: [EngineOperation; 8] = [
        EngineOperation::CreateWorkflow,
        EngineOperation::GetWorkflow,
        EngineOperation::ListWorkflows,
        EngineOperation::UpdateWorkflowStatus,
        EngineOperation::DeleteWorkflow,
        EngineOperation::ExecuteWorkflow,
        EngineOperation::GetExecutionStatus,
        EngineOperation::ListExecutions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EngineOperation::CreateWorkflow => "create_workflow",
            EngineOperation::GetWorkflow => "get_workflow",
            EngineOperation::ListWorkflows => "list_workflows",
            EngineOperation::UpdateWorkflowStatus => "update_workflow_status",
            EngineOperation::DeleteWorkflow => "delete_workflow",
            EngineOperation::ExecuteWorkflow => "execute_workflow",
            EngineOperation::GetExecutionStatus => "get_execution_status",
            EngineOperation::ListExecutions => "list_executions",
        }
    }
}

/// Listing filter for workflows. `cursor` is the engine's opaque pagination
/// token from a previous page.
#[derive(Debug, Clone, Default)]
pub struct ListWorkflowsFilter {
    pub project_id: Option<String>,
    pub folder_id: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// Listing filter for executions.
#[derive(Debug, Clone, Default)]
pub struct ListExecutionsFilter {
    pub project_id: Option<String>,
    pub workflow_id: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// Trait for workflow-engine backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in flowgate-infra (e.g., `HttpEngineAdapter`).
pub trait EngineClient: Send + Sync {
    /// Human-readable adapter name (e.g., "activepieces-http").
    fn name(&self) -> &str;

    /// The operations this adapter actually implements. Used by
    /// [`verify_interface`] at startup and in adapter tests.
    fn operations(&self) -> Vec<EngineOperation>;

    fn create_workflow(
        &self,
        workflow: &NewWorkflow,
    ) -> impl std::future::Future<Output = Result<WorkflowDescriptor, EngineError>> + Send;

    fn get_workflow(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<WorkflowDescriptor, EngineError>> + Send;

    fn list_workflows(
        &self,
        filter: &ListWorkflowsFilter,
    ) -> impl std::future::Future<Output = Result<WorkflowPage, EngineError>> + Send;

    fn update_workflow_status(
        &self,
        id: &str,
        status: WorkflowStatus,
    ) -> impl std::future::Future<Output = Result<WorkflowDescriptor, EngineError>> + Send;

    fn delete_workflow(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), EngineError>> + Send;

    /// Trigger an execution, optionally with an input payload the engine
    /// passes to the workflow's trigger.
    fn execute_workflow(
        &self,
        id: &str,
        input: Option<serde_json::Value>,
    ) -> impl std::future::Future<Output = Result<ExecutionDescriptor, EngineError>> + Send;

    fn get_execution_status(
        &self,
        execution_id: &str,
    ) -> impl std::future::Future<Output = Result<ExecutionDescriptor, EngineError>> + Send;

    fn list_executions(
        &self,
        filter: &ListExecutionsFilter,
    ) -> impl std::future::Future<Output = Result<ExecutionPage, EngineError>> + Send;
}

/// Check that an adapter declares every required operation.
///
/// The trait makes missing methods a compile error, but `operations()` is
/// adapter-declared and feeds diagnostics and the startup log; this keeps
/// the declaration honest.
pub fn verify_interface<C: EngineClient>(client: &C) -> Result<(), EngineError> {
    let declared = client.operations();
    let missing: Vec<String> = EngineOperation::ALL
        .iter()
        .filter(|op| !declared.contains(op))
        .map(|op| op.name().to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EngineError::InterfaceViolation {
            client: client.name().to_string(),
            missing,
        })
    }
}
