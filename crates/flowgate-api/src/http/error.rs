//! Application error type mapping to HTTP status codes and envelope format.
//!
//! The federation error split matters to callers: engine-not-configured is a
//! deployment state (503), engine-rejected and engine-unreachable are
//! upstream failures (502), and identity failures are always 401.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use flowgate_types::error::{
    AuthError, EngineError, FederationError, KeyStoreError, RepositoryError, TokenError,
};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Identity verification failures.
    Auth(AuthError),
    /// Assertion minting failures.
    Token(TokenError),
    /// Engine session exchange failures.
    Federation(FederationError),
    /// Engine REST / proxy failures.
    Engine(EngineError),
    /// User persistence failures.
    Repository(RepositoryError),
    /// Signing-key store failures.
    KeyStore(KeyStoreError),
    /// Generic internal error.
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        AppError::Token(e)
    }
}

impl From<FederationError> for AppError {
    fn from(e: FederationError) -> Self {
        AppError::Federation(e)
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::Engine(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<KeyStoreError> for AppError {
    fn from(e: KeyStoreError) -> Self {
        AppError::KeyStore(e)
    }
}

impl From<flowgate_core::federation::FederateError> for AppError {
    fn from(e: flowgate_core::federation::FederateError) -> Self {
        match e {
            flowgate_core::federation::FederateError::Auth(e) => AppError::Auth(e),
            flowgate_core::federation::FederateError::Repository(e) => AppError::Repository(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Auth(e) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string()),
            AppError::Token(TokenError::InvalidRole(role)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("invalid engine role: '{role}'"),
            ),
            AppError::Token(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TOKEN_ERROR",
                e.to_string(),
            ),
            AppError::Federation(FederationError::NotConfigured) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ENGINE_NOT_CONFIGURED",
                "Workflow engine is not configured".to_string(),
            ),
            AppError::Federation(FederationError::Rejected { .. }) => (
                StatusCode::BAD_GATEWAY,
                "FEDERATION_REJECTED",
                self_message(&self),
            ),
            AppError::Federation(FederationError::Transport(_)) => (
                StatusCode::BAD_GATEWAY,
                "ENGINE_UNREACHABLE",
                self_message(&self),
            ),
            AppError::Federation(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "FEDERATION_ERROR",
                e.to_string(),
            ),
            AppError::Engine(EngineError::NotFound) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Entity not found in engine".to_string(),
            ),
            AppError::Engine(EngineError::Unreachable { .. }) => (
                StatusCode::BAD_GATEWAY,
                "ENGINE_UNREACHABLE",
                self_message(&self),
            ),
            AppError::Engine(EngineError::Engine { status, detail }) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "ENGINE_ERROR",
                detail.clone(),
            ),
            AppError::Engine(e) => (
                StatusCode::BAD_GATEWAY,
                "ENGINE_ERROR",
                e.to_string(),
            ),
            AppError::Repository(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::KeyStore(KeyStoreError::StorageUnavailable) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "KEYSTORE_UNAVAILABLE",
                KeyStoreError::StorageUnavailable.to_string(),
            ),
            AppError::KeyStore(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "KEYSTORE_ERROR",
                e.to_string(),
            ),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

fn self_message(err: &AppError) -> String {
    match err {
        AppError::Federation(e) => e.to_string(),
        AppError::Engine(e) => e.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_maps_to_401() {
        let response = AppError::Auth(AuthError::InvalidToken).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_engine_not_configured_maps_to_503() {
        let response = AppError::Federation(FederationError::NotConfigured).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_federation_rejection_maps_to_502() {
        let response = AppError::Federation(FederationError::Rejected {
            status: 401,
            detail: "bad assertion".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_engine_unreachable_maps_to_502() {
        let response = AppError::Engine(EngineError::Unreachable {
            status: Some(503),
            detail: "down".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_engine_status_is_relayed() {
        let response = AppError::Engine(EngineError::Engine {
            status: 409,
            detail: "conflict".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_role_maps_to_400() {
        let response = AppError::Token(TokenError::InvalidRole("OWNER".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
