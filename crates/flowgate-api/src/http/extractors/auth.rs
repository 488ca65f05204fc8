//! Bearer token extractor.
//!
//! Pulls the raw identity-provider token from `Authorization: Bearer <token>`.
//! Verification happens in the handlers via the federation exchanger; the
//! extractor only enforces presence and shape.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use flowgate_types::error::AuthError;

use crate::http::error::AppError;

/// The caller's raw bearer token, unverified.
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_bearer(parts).map(BearerToken)
    }
}

fn extract_bearer(parts: &Parts) -> Result<String, AppError> {
    let auth = parts
        .headers
        .get("authorization")
        .ok_or(AppError::Auth(AuthError::MissingToken))?;

    let auth_str = auth
        .to_str()
        .map_err(|_| AppError::Auth(AuthError::MissingToken))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(AppError::Auth(AuthError::MissingToken))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Auth(AuthError::MissingToken));
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/auth/me");
        if let Some(value) = value {
            builder = builder.header("authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_extracts_bearer_token() {
        let parts = parts_with_auth(Some("Bearer id-token-123"));
        assert_eq!(extract_bearer(&parts).unwrap(), "id-token-123");
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let parts = parts_with_auth(None);
        assert!(matches!(
            extract_bearer(&parts),
            Err(AppError::Auth(AuthError::MissingToken))
        ));
    }

    #[test]
    fn test_non_bearer_scheme_is_rejected() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert!(extract_bearer(&parts).is_err());
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let parts = parts_with_auth(Some("Bearer   "));
        assert!(extract_bearer(&parts).is_err());
    }
}
