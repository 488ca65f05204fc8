//! Engine key and embedding endpoint handlers.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use flowgate_core::keys::SigningKeyStore;
use flowgate_core::token::role_from_str;
use flowgate_types::key::PublicKeyInfo;

use crate::http::error::AppError;
use crate::http::extractors::auth::BearerToken;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/engine/public-key - The active verification key.
///
/// Served unauthenticated: the engine fetches this to register the key it
/// verifies assertion signatures against. Creates the keypair on first call.
pub async fn public_key(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PublicKeyInfo>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let info = state.key_store.public_key().await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(info, request_id, elapsed)
        .with_link("self", "/api/v1/engine/public-key");

    Ok(Json(resp))
}

#[derive(Debug, Deserialize)]
pub struct EmbedTokenQuery {
    /// Explicit role override (`ADMIN`/`EDITOR`/`VIEWER`). Defaults to the
    /// user's own role.
    pub role: Option<String>,
}

/// Assertion plus the engine location, enough for the frontend to mount
/// the engine UI in an iframe.
#[derive(Debug, Serialize)]
pub struct EmbedTokenResponse {
    pub token: String,
    pub key_id: String,
    pub expires_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_url: Option<String>,
}

/// GET /api/v1/engine/embed-token - Mint an assertion for UI embedding.
pub async fn embed_token(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(query): Query<EmbedTokenQuery>,
) -> Result<Json<ApiResponse<EmbedTokenResponse>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let role = query.role.as_deref().map(role_from_str).transpose()?;

    let user = state.exchanger.authenticate(&token).await?;
    let assertion = state.exchanger.mint_assertion(&user, role).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        EmbedTokenResponse {
            token: assertion.token,
            key_id: assertion.key_id,
            expires_at: assertion.expires_at,
            instance_url: state.exchanger.engine_base_url().map(String::from),
        },
        request_id,
        elapsed,
    )
    .with_link("self", "/api/v1/engine/embed-token");

    Ok(Json(resp))
}
