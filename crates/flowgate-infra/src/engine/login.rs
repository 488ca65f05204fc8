//! Engine managed-authentication login exchange.
//!
//! Trades a signed assertion JWT for an engine session token via
//! `POST {base}/api/v1/managed-authn/external-token`.

use std::time::Duration;

use serde::Deserialize;

use flowgate_core::federation::EngineLoginExchange;
use flowgate_types::error::FederationError;

const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Rejection details are engine-controlled free text; keep log and error
/// payloads bounded.
const MAX_DETAIL_LEN: usize = 200;

/// Reqwest-based implementation of `EngineLoginExchange`.
pub struct HttpLoginExchange {
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

impl HttpLoginExchange {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(LOGIN_TIMEOUT).build()?;
        Ok(Self { client })
    }
}

pub(crate) fn truncate_detail(detail: &str) -> String {
    if detail.len() <= MAX_DETAIL_LEN {
        detail.to_string()
    } else {
        let mut end = MAX_DETAIL_LEN;
        while !detail.is_char_boundary(end) {
            end -= 1;
        }
        detail[..end].to_string()
    }
}

impl EngineLoginExchange for HttpLoginExchange {
    async fn exchange(&self, base_url: &str, assertion: &str) -> Result<String, FederationError> {
        let url = format!(
            "{}/api/v1/managed-authn/external-token",
            base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "externalAccessToken": assertion }))
            .send()
            .await
            .map_err(|err| FederationError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FederationError::Rejected {
                status: status.as_u16(),
                detail: truncate_detail(&detail),
            });
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|err| FederationError::Transport(format!("malformed login response: {err}")))?;
        Ok(body.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_detail_bounds_length() {
        let long = "x".repeat(500);
        assert_eq!(truncate_detail(&long).len(), 200);
        assert_eq!(truncate_detail("short"), "short");
    }

    #[test]
    fn test_truncate_detail_respects_char_boundaries() {
        let multibyte = "é".repeat(150);
        let truncated = truncate_detail(&multibyte);
        assert!(truncated.len() <= 200);
        assert!(truncated.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_login_response_parses_token() {
        let body: LoginResponse =
            serde_json::from_str(r#"{"token": "session-abc"}"#).unwrap();
        assert_eq!(body.token, "session-abc");
    }
}
