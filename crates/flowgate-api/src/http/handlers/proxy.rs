//! Pass-through proxy handler.
//!
//! Forwards any sub-path under `/api/v1/engine/proxy/` to the engine,
//! relaying the engine's answer verbatim. The caller must authenticate
//! with the identity provider first; the engine-side credential is
//! attached by the proxy.

use axum::body::{Body, Bytes};
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::Response;

use flowgate_infra::engine::ProxiedRequest;
use flowgate_types::error::FederationError;

use crate::http::error::AppError;
use crate::http::extractors::auth::BearerToken;
use crate::state::AppState;

/// ANY /api/v1/engine/proxy/{*path} - Forward a request to the engine.
pub async fn forward(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    state.exchanger.authenticate(&token).await?;

    let proxy = state
        .proxy
        .clone()
        .ok_or(AppError::Federation(FederationError::NotConfigured))?;

    let proxied = proxy
        .forward(ProxiedRequest {
            method,
            path,
            query,
            headers,
            body: body.to_vec(),
        })
        .await?;

    let mut builder = Response::builder()
        .status(StatusCode::from_u16(proxied.status).unwrap_or(StatusCode::BAD_GATEWAY));
    if let Some(response_headers) = builder.headers_mut() {
        *response_headers = proxied.headers;
    }
    builder
        .body(Body::from(proxied.body))
        .map_err(|e| AppError::Internal(e.to_string()))
}
