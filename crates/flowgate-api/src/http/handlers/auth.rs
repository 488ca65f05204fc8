//! Authentication and federation endpoint handlers.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use flowgate_types::identity::LocalUser;

use crate::http::error::AppError;
use crate::http::extractors::auth::BearerToken;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Federation result returned on login.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub user: LocalUser,
    /// Engine session token, absent when the engine is unavailable or
    /// rejected the assertion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_token: Option<String>,
    /// Why the engine leg failed, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_error: Option<String>,
}

/// POST /api/v1/auth/verify - Verify the bearer token, provision the user,
/// and best-effort exchange an assertion for an engine session.
///
/// An engine failure never fails this call: the user still gets in, with
/// `engine_error` explaining the degraded state.
pub async fn verify(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<VerifyResponse>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let outcome = state.exchanger.federate(&token).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        VerifyResponse {
            user: outcome.user,
            engine_token: outcome.engine_token,
            engine_error: outcome.engine_error,
        },
        request_id,
        elapsed,
    )
    .with_link("self", "/api/v1/auth/verify");

    Ok(Json(resp))
}

/// GET /api/v1/auth/me - The authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<LocalUser>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let user = state.exchanger.authenticate(&token).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp =
        ApiResponse::success(user, request_id, elapsed).with_link("self", "/api/v1/auth/me");

    Ok(Json(resp))
}

/// GET /api/v1/auth/engine-token - Explicitly request an engine session.
///
/// Unlike `/auth/verify`, engine failures are surfaced with distinguishable
/// codes: 503 when no engine is configured, 502 when it rejected the
/// assertion or cannot be reached.
pub async fn engine_token(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let user = state.exchanger.authenticate(&token).await?;
    let engine_token = state.exchanger.engine_session(&user).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({ "token": engine_token }),
        request_id,
        elapsed,
    )
    .with_link("self", "/api/v1/auth/engine-token");

    Ok(Json(resp))
}
