//! Workflow endpoint handlers: named convenience routes over the engine
//! abstraction layer.
//!
//! Everything here goes through the `EngineClient` trait, so these routes
//! survive an engine swap untouched.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use flowgate_core::engine::{EngineClient, ListExecutionsFilter, ListWorkflowsFilter};
use flowgate_infra::engine::HttpEngineAdapter;
use flowgate_types::engine::{
    ExecutionDescriptor, ExecutionPage, NewWorkflow, WorkflowDescriptor, WorkflowPage,
    WorkflowStatus,
};
use flowgate_types::error::FederationError;

use crate::http::error::AppError;
use crate::http::extractors::auth::BearerToken;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Resolve the engine adapter, or fail with the not-configured code.
fn engine(state: &AppState) -> Result<Arc<HttpEngineAdapter>, AppError> {
    state
        .engine
        .clone()
        .ok_or(AppError::Federation(FederationError::NotConfigured))
}

async fn authorize(state: &AppState, token: &str) -> Result<(), AppError> {
    state.exchanger.authenticate(token).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkflowRequest {
    pub name: String,
    /// Defaults to the configured project.
    pub project_id: Option<String>,
    pub trigger: Option<serde_json::Value>,
    pub folder_id: Option<String>,
}

/// POST /api/v1/engine/workflows - Create a workflow.
pub async fn create_workflow(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(body): Json<CreateWorkflowRequest>,
) -> Result<Json<ApiResponse<WorkflowDescriptor>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    authorize(&state, &token).await?;
    let workflow = NewWorkflow {
        name: body.name,
        project_id: body
            .project_id
            .unwrap_or_else(|| state.settings.default_project_id.clone()),
        trigger: body.trigger,
        folder_id: body.folder_id,
    };
    let descriptor = engine(&state)?.create_workflow(&workflow).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/engine/workflows/{}", descriptor.id);
    let resp = ApiResponse::success(descriptor, request_id, elapsed).with_link("self", &link);

    Ok(Json(resp))
}

#[derive(Debug, Deserialize)]
pub struct ListWorkflowsQuery {
    pub project_id: Option<String>,
    pub folder_id: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// GET /api/v1/engine/workflows - List workflows (cursor paginated).
pub async fn list_workflows(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(query): Query<ListWorkflowsQuery>,
) -> Result<Json<ApiResponse<WorkflowPage>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    authorize(&state, &token).await?;
    let filter = ListWorkflowsFilter {
        project_id: query
            .project_id
            .or_else(|| Some(state.settings.default_project_id.clone())),
        folder_id: query.folder_id,
        cursor: query.cursor,
        limit: query.limit,
    };
    let page = engine(&state)?.list_workflows(&filter).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(page, request_id, elapsed)
        .with_link("self", "/api/v1/engine/workflows");

    Ok(Json(resp))
}

/// GET /api/v1/engine/workflows/:id - Fetch one workflow.
pub async fn get_workflow(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WorkflowDescriptor>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    authorize(&state, &token).await?;
    let descriptor = engine(&state)?.get_workflow(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/engine/workflows/{id}");
    let resp = ApiResponse::success(descriptor, request_id, elapsed).with_link("self", &link);

    Ok(Json(resp))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: WorkflowStatus,
}

/// PUT /api/v1/engine/workflows/:id/status - Enable or disable a workflow.
pub async fn update_workflow_status(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<WorkflowDescriptor>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    authorize(&state, &token).await?;
    let descriptor = engine(&state)?
        .update_workflow_status(&id, body.status)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/engine/workflows/{id}");
    let resp = ApiResponse::success(descriptor, request_id, elapsed).with_link("self", &link);

    Ok(Json(resp))
}

/// DELETE /api/v1/engine/workflows/:id - Delete a workflow.
pub async fn delete_workflow(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    authorize(&state, &token).await?;
    engine(&state)?.delete_workflow(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true, "id": id}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

#[derive(Debug, Deserialize)]
pub struct ExecuteWorkflowRequest {
    pub input: Option<serde_json::Value>,
}

/// POST /api/v1/engine/workflows/:id/execute - Trigger an execution.
pub async fn execute_workflow(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<String>,
    Json(body): Json<ExecuteWorkflowRequest>,
) -> Result<Json<ApiResponse<ExecutionDescriptor>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    authorize(&state, &token).await?;
    let execution = engine(&state)?.execute_workflow(&id, body.input).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/engine/executions/{}", execution.id);
    let resp = ApiResponse::success(execution, request_id, elapsed).with_link("self", &link);

    Ok(Json(resp))
}

/// GET /api/v1/engine/executions/:id - Fetch one execution.
pub async fn get_execution(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ExecutionDescriptor>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    authorize(&state, &token).await?;
    let execution = engine(&state)?.get_execution_status(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/engine/executions/{id}");
    let resp = ApiResponse::success(execution, request_id, elapsed).with_link("self", &link);

    Ok(Json(resp))
}

#[derive(Debug, Deserialize)]
pub struct ListExecutionsQuery {
    pub project_id: Option<String>,
    pub workflow_id: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// GET /api/v1/engine/executions - List executions (cursor paginated).
pub async fn list_executions(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(query): Query<ListExecutionsQuery>,
) -> Result<Json<ApiResponse<ExecutionPage>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    authorize(&state, &token).await?;
    let filter = ListExecutionsFilter {
        project_id: query
            .project_id
            .or_else(|| Some(state.settings.default_project_id.clone())),
        workflow_id: query.workflow_id,
        cursor: query.cursor,
        limit: query.limit,
    };
    let page = engine(&state)?.list_executions(&filter).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(page, request_id, elapsed)
        .with_link("self", "/api/v1/engine/executions");

    Ok(Json(resp))
}
