//! HTTP identity verifier.
//!
//! Verifies bearer tokens against the primary identity provider's
//! token-lookup endpoint. The provider is the sole authority: any failure
//! (network, non-2xx, malformed body, unknown token) collapses to
//! [`AuthError::InvalidToken`] so callers cannot distinguish a forged token
//! from a provider outage.

use std::time::Duration;

use serde::Deserialize;

use flowgate_core::identity::IdentityVerifier;
use flowgate_types::error::AuthError;
use flowgate_types::identity::VerifiedIdentity;

const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Reqwest-based implementation of `IdentityVerifier`.
///
/// An unconfigured verify URL means every token is rejected without a
/// network round trip; the rejection is logged so the resulting 401s are
/// traceable to deployment config rather than bad tokens.
pub struct HttpIdentityVerifier {
    client: reqwest::Client,
    verify_url: Option<String>,
}

impl HttpIdentityVerifier {
    pub fn new(verify_url: Option<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(VERIFY_TIMEOUT).build()?;
        Ok(Self {
            client,
            verify_url: verify_url.filter(|u| !u.is_empty()),
        })
    }
}

/// Provider lookup response: the token's account, wrapped in a `users`
/// array that holds exactly one entry for a valid token.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<ProviderUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    tenant_id: Option<String>,
}

fn identity_from_user(user: ProviderUser) -> Result<VerifiedIdentity, AuthError> {
    let email = user.email.filter(|e| !e.is_empty()).ok_or_else(|| {
        tracing::debug!("provider returned an account without an email");
        AuthError::InvalidToken
    })?;
    Ok(VerifiedIdentity {
        subject_id: user.local_id,
        email,
        email_verified: user.email_verified,
        display_name: user.display_name.filter(|n| !n.is_empty()),
        picture: user.photo_url.filter(|p| !p.is_empty()),
        tenant_id: user.tenant_id.filter(|t| !t.is_empty()),
    })
}

impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let Some(verify_url) = &self.verify_url else {
            tracing::warn!("identity_verify_url is not configured; rejecting bearer token");
            return Err(AuthError::InvalidToken);
        };

        let response = self
            .client
            .post(verify_url)
            .json(&serde_json::json!({ "idToken": token }))
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "identity provider unreachable");
                AuthError::InvalidToken
            })?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "identity provider rejected token");
            return Err(AuthError::InvalidToken);
        }

        let body: LookupResponse = response.json().await.map_err(|err| {
            tracing::warn!(error = %err, "malformed identity provider response");
            AuthError::InvalidToken
        })?;

        let user = body.users.into_iter().next().ok_or(AuthError::InvalidToken)?;
        identity_from_user(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_response_parses_provider_shape() {
        let json = r#"{
            "users": [{
                "localId": "sub-123",
                "email": "ada@example.com",
                "emailVerified": true,
                "displayName": "Ada Lovelace",
                "photoUrl": "https://example.com/a.png"
            }]
        }"#;
        let parsed: LookupResponse = serde_json::from_str(json).unwrap();
        let identity = identity_from_user(parsed.users.into_iter().next().unwrap()).unwrap();
        assert_eq!(identity.subject_id, "sub-123");
        assert_eq!(identity.email, "ada@example.com");
        assert!(identity.email_verified);
        assert_eq!(identity.display_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_account_without_email_is_invalid() {
        let user = ProviderUser {
            local_id: "sub-1".to_string(),
            email: None,
            email_verified: false,
            display_name: None,
            photo_url: None,
            tenant_id: None,
        };
        assert!(matches!(
            identity_from_user(user),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_empty_users_array_parses() {
        let parsed: LookupResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.users.is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_verifier_rejects_without_network() {
        let verifier = HttpIdentityVerifier::new(None).unwrap();
        assert!(matches!(
            verifier.verify("any-token").await,
            Err(AuthError::InvalidToken)
        ));

        // An empty configured URL is treated the same as none.
        let verifier = HttpIdentityVerifier::new(Some(String::new())).unwrap();
        assert!(matches!(
            verifier.verify("any-token").await,
            Err(AuthError::InvalidToken)
        ));
    }
}
