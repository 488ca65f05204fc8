//! HTTP engine adapter.
//!
//! Binds the `EngineClient` trait to the engine's REST API. All requests
//! are bearer-authenticated with the service API key and bounded by a
//! 15-second timeout.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use flowgate_core::engine::{
    EngineClient, EngineOperation, ListExecutionsFilter, ListWorkflowsFilter,
};
use flowgate_types::engine::{
    ExecutionDescriptor, ExecutionPage, NewWorkflow, WorkflowDescriptor, WorkflowPage,
    WorkflowStatus,
};
use flowgate_types::error::EngineError;

use super::login::truncate_detail;
use super::types::{
    workflow_status_to_engine, FlowDto, FlowRunDto, SeekPage,
};

const REST_TIMEOUT: Duration = Duration::from_secs(15);

/// Listing page sizes are clamped to what the engine accepts.
const MAX_PAGE_LIMIT: u32 = 100;

/// Reqwest-based implementation of `EngineClient`.
pub struct HttpEngineAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl HttpEngineAdapter {
    pub fn new(base_url: String, api_key: SecretString) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, EngineError> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|err| EngineError::Deserialization(err.to_string()))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, EngineError> {
        let response = request
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(|err| EngineError::Unreachable {
                status: None,
                detail: err.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = truncate_detail(&response.text().await.unwrap_or_default());
        Err(classify_status(status.as_u16(), detail))
    }
}

/// Fold an engine error status into the adapter error vocabulary.
///
/// Gateway-class statuses mean the engine itself is down or being
/// restarted behind its proxy, so they count as unreachable.
pub(crate) fn classify_status(status: u16, detail: String) -> EngineError {
    match status {
        404 => EngineError::NotFound,
        502 | 503 | 504 => EngineError::Unreachable {
            status: Some(status),
            detail,
        },
        _ => EngineError::Engine { status, detail },
    }
}

fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(20).clamp(1, MAX_PAGE_LIMIT)
}

impl EngineClient for HttpEngineAdapter {
    fn name(&self) -> &str {
        "http-engine"
    }

    fn operations(&self) -> Vec<EngineOperation> {
        EngineOperation::ALL.to_vec()
    }

    async fn create_workflow(
        &self,
        workflow: &NewWorkflow,
    ) -> Result<WorkflowDescriptor, EngineError> {
        let mut body = serde_json::json!({
            "displayName": workflow.name,
            "projectId": workflow.project_id,
        });
        if let Some(folder_id) = &workflow.folder_id {
            body["folderId"] = serde_json::json!(folder_id);
        }
        if let Some(trigger) = &workflow.trigger {
            body["trigger"] = trigger.clone();
        }

        let dto: FlowDto = self
            .send_json(self.client.post(self.url("flows")).json(&body))
            .await?;
        Ok(dto.into_descriptor())
    }

    async fn get_workflow(&self, id: &str) -> Result<WorkflowDescriptor, EngineError> {
        let dto: FlowDto = self
            .send_json(self.client.get(self.url(&format!("flows/{id}"))))
            .await?;
        Ok(dto.into_descriptor())
    }

    async fn list_workflows(
        &self,
        filter: &ListWorkflowsFilter,
    ) -> Result<WorkflowPage, EngineError> {
        let mut request = self
            .client
            .get(self.url("flows"))
            .query(&[("limit", clamp_limit(filter.limit).to_string())]);
        if let Some(project_id) = &filter.project_id {
            request = request.query(&[("projectId", project_id)]);
        }
        if let Some(folder_id) = &filter.folder_id {
            request = request.query(&[("folderId", folder_id)]);
        }
        if let Some(cursor) = &filter.cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        let page: SeekPage<FlowDto> = self.send_json(request).await?;
        Ok(WorkflowPage {
            items: page.data.into_iter().map(FlowDto::into_descriptor).collect(),
            next_cursor: page.next,
        })
    }

    async fn update_workflow_status(
        &self,
        id: &str,
        status: WorkflowStatus,
    ) -> Result<WorkflowDescriptor, EngineError> {
        let body = serde_json::json!({
            "type": "CHANGE_STATUS",
            "request": { "status": workflow_status_to_engine(status) },
        });
        let dto: FlowDto = self
            .send_json(self.client.post(self.url(&format!("flows/{id}"))).json(&body))
            .await?;
        Ok(dto.into_descriptor())
    }

    async fn delete_workflow(&self, id: &str) -> Result<(), EngineError> {
        self.send(self.client.delete(self.url(&format!("flows/{id}"))))
            .await?;
        Ok(())
    }

    async fn execute_workflow(
        &self,
        id: &str,
        input: Option<serde_json::Value>,
    ) -> Result<ExecutionDescriptor, EngineError> {
        let body = serde_json::json!({
            "flowId": id,
            "payload": input.unwrap_or(serde_json::Value::Null),
        });
        let dto: FlowRunDto = self
            .send_json(self.client.post(self.url("flow-runs")).json(&body))
            .await?;
        Ok(dto.into_descriptor())
    }

    async fn get_execution_status(
        &self,
        execution_id: &str,
    ) -> Result<ExecutionDescriptor, EngineError> {
        let dto: FlowRunDto = self
            .send_json(self.client.get(self.url(&format!("flow-runs/{execution_id}"))))
            .await?;
        Ok(dto.into_descriptor())
    }

    async fn list_executions(
        &self,
        filter: &ListExecutionsFilter,
    ) -> Result<ExecutionPage, EngineError> {
        let mut request = self
            .client
            .get(self.url("flow-runs"))
            .query(&[("limit", clamp_limit(filter.limit).to_string())]);
        if let Some(project_id) = &filter.project_id {
            request = request.query(&[("projectId", project_id)]);
        }
        if let Some(workflow_id) = &filter.workflow_id {
            request = request.query(&[("flowId", workflow_id)]);
        }
        if let Some(cursor) = &filter.cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        let page: SeekPage<FlowRunDto> = self.send_json(request).await?;
        Ok(ExecutionPage {
            items: page
                .data
                .into_iter()
                .map(FlowRunDto::into_descriptor)
                .collect(),
            next_cursor: page.next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgate_core::engine::verify_interface;

    fn adapter() -> HttpEngineAdapter {
        HttpEngineAdapter::new(
            "http://engine:80/".to_string(),
            SecretString::from("svc-key"),
        )
        .unwrap()
    }

    #[test]
    fn test_adapter_declares_complete_interface() {
        assert!(verify_interface(&adapter()).is_ok());
    }

    #[test]
    fn test_url_joining_strips_slashes() {
        let adapter = adapter();
        assert_eq!(adapter.url("flows"), "http://engine:80/api/v1/flows");
        assert_eq!(adapter.url("/flows/f1"), "http://engine:80/api/v1/flows/f1");
    }

    #[test]
    fn test_classify_gateway_statuses_as_unreachable() {
        for status in [502u16, 503, 504] {
            match classify_status(status, "down".to_string()) {
                EngineError::Unreachable { status: Some(s), .. } => assert_eq!(s, status),
                other => panic!("expected unreachable, got {other}"),
            }
        }
    }

    #[test]
    fn test_classify_not_found_and_engine_errors() {
        assert!(matches!(
            classify_status(404, String::new()),
            EngineError::NotFound
        ));
        assert!(matches!(
            classify_status(400, "bad".to_string()),
            EngineError::Engine { status: 400, .. }
        ));
    }

    #[test]
    fn test_limit_clamping() {
        assert_eq!(clamp_limit(None), 20);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(10_000)), 100);
        assert_eq!(clamp_limit(Some(50)), 50);
    }
}
