//! Federation exchanger service.
//!
//! Orchestrates the full login federation: verify the bearer token with the
//! primary identity provider, resolve or provision the local user, mint an
//! engine assertion, and exchange it for an engine session token.
//!
//! The engine leg is strictly best-effort. A user whose identity verified
//! must be able to use the application even when the engine is down, so an
//! exchange failure is folded into the outcome instead of failing it.

use thiserror::Error;

use flowgate_types::error::{AuthError, FederationError, RepositoryError, TokenError};
use flowgate_types::identity::{EngineRole, LocalUser, VerifiedIdentity};

use crate::identity::IdentityVerifier;
use crate::keys::SigningKeyStore;
use crate::repository::UserRepository;
use crate::token::{SignedAssertion, TokenForge};

/// Trait for the assertion-for-session exchange with the engine.
///
/// Implementations live in flowgate-infra (e.g., `HttpLoginExchange`).
pub trait EngineLoginExchange: Send + Sync {
    /// POST the signed assertion to the engine's managed-authentication
    /// endpoint and return the session token it issues.
    fn exchange(
        &self,
        base_url: &str,
        assertion: &str,
    ) -> impl std::future::Future<Output = Result<String, FederationError>> + Send;
}

/// Terminal failures of a federation attempt. Unlike the engine leg, these
/// mean the caller gets no user at all.
#[derive(Debug, Error)]
pub enum FederateError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of a federation attempt for a verified identity.
#[derive(Debug, Clone)]
pub struct FederationOutcome {
    pub user: LocalUser,
    /// Engine session token, when the engine was available and accepted
    /// the assertion.
    pub engine_token: Option<String>,
    /// Human-readable reason the engine leg was skipped or failed.
    /// `None` together with `engine_token: None` means the engine is
    /// simply not configured.
    pub engine_error: Option<String>,
}

/// Decide whether the engine leg should run at all.
///
/// An absent or empty base URL means no engine is deployed. A loopback URL
/// on an externally hosted deployment is a stale placeholder left over from
/// local development and is treated the same way.
pub fn engine_available(base_url: Option<&str>, externally_hosted: bool) -> bool {
    let Some(url) = base_url else {
        return false;
    };
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    if externally_hosted {
        let loopback = ["localhost", "127.0.0.1", "0.0.0.0"]
            .iter()
            .any(|host| url.contains(host));
        if loopback {
            return false;
        }
    }
    true
}

/// Orchestrates identity federation across the provider, the local user
/// store, the token forge, and the engine login exchange.
pub struct FederationExchanger<V, U, K, L>
where
    V: IdentityVerifier,
    U: UserRepository,
    K: SigningKeyStore,
    L: EngineLoginExchange,
{
    verifier: V,
    users: U,
    forge: TokenForge<K>,
    login: L,
    engine_base_url: Option<String>,
    externally_hosted: bool,
    default_project_id: String,
}

impl<V, U, K, L> FederationExchanger<V, U, K, L>
where
    V: IdentityVerifier,
    U: UserRepository,
    K: SigningKeyStore,
    L: EngineLoginExchange,
{
    pub fn new(
        verifier: V,
        users: U,
        forge: TokenForge<K>,
        login: L,
        engine_base_url: Option<String>,
        externally_hosted: bool,
        default_project_id: String,
    ) -> Self {
        Self {
            verifier,
            users,
            forge,
            login,
            engine_base_url,
            externally_hosted,
            default_project_id,
        }
    }

    /// Whether the engine leg will run for this configuration.
    pub fn engine_enabled(&self) -> bool {
        engine_available(self.engine_base_url.as_deref(), self.externally_hosted)
    }

    /// The configured engine base URL, if any. Exposed for UI embedding.
    pub fn engine_base_url(&self) -> Option<&str> {
        self.engine_base_url.as_deref()
    }

    /// Mint a raw assertion for `user`, scoped to the default project.
    /// `role` overrides the user's default role when given.
    pub async fn mint_assertion(
        &self,
        user: &LocalUser,
        role: Option<EngineRole>,
    ) -> Result<SignedAssertion, TokenError> {
        match role {
            Some(role) => self.forge.mint(user, &self.default_project_id, role).await,
            None => {
                self.forge
                    .mint_for_user(user, &self.default_project_id)
                    .await
            }
        }
    }

    /// Verify a bearer token and resolve the local user, without touching
    /// the engine. Used by identity-only endpoints.
    pub async fn authenticate(&self, bearer: &str) -> Result<LocalUser, FederateError> {
        let identity = self.verifier.verify(bearer).await?;
        Ok(self.resolve_user(&identity).await?)
    }

    /// Full federation: authenticate, then exchange an assertion for an
    /// engine session token when the engine is available.
    pub async fn federate(&self, bearer: &str) -> Result<FederationOutcome, FederateError> {
        let identity = self.verifier.verify(bearer).await?;
        let user = self.resolve_user(&identity).await?;

        if !self.engine_enabled() {
            tracing::debug!(user_id = %user.id, "engine unavailable, skipping session exchange");
            return Ok(FederationOutcome {
                user,
                engine_token: None,
                engine_error: None,
            });
        }

        match self.engine_session(&user).await {
            Ok(token) => Ok(FederationOutcome {
                user,
                engine_token: Some(token),
                engine_error: None,
            }),
            Err(err) => {
                tracing::warn!(user_id = %user.id, error = %err, "engine session exchange failed");
                Ok(FederationOutcome {
                    user,
                    engine_token: None,
                    engine_error: Some(err.to_string()),
                })
            }
        }
    }

    /// Mint an assertion for `user` and exchange it for an engine session
    /// token. Unlike [`federate`](Self::federate), failures here are
    /// surfaced to the caller so they can be distinguished.
    pub async fn engine_session(&self, user: &LocalUser) -> Result<String, FederationError> {
        if !self.engine_enabled() {
            return Err(FederationError::NotConfigured);
        }
        // engine_enabled() guarantees the URL is present
        let base_url = self
            .engine_base_url
            .as_deref()
            .ok_or(FederationError::NotConfigured)?;

        let assertion = self
            .forge
            .mint_for_user(user, &self.default_project_id)
            .await?;
        self.login.exchange(base_url, &assertion.token).await
    }

    /// Find the user for a verified identity, provisioning on first login
    /// and refreshing profile fields on repeats.
    async fn resolve_user(
        &self,
        identity: &VerifiedIdentity,
    ) -> Result<LocalUser, RepositoryError> {
        match self.users.find_by_external_id(&identity.subject_id).await? {
            Some(mut existing) => {
                let (first_name, last_name) = identity.name_parts();
                existing.email = identity.email.clone();
                if !first_name.is_empty() {
                    existing.first_name = first_name;
                    existing.last_name = last_name;
                }
                existing.display_name = identity
                    .display_name
                    .clone()
                    .or(existing.display_name.take());
                existing.avatar_url = identity.picture.clone().or(existing.avatar_url.take());
                existing.last_login_at = Some(chrono::Utc::now());
                existing.updated_at = chrono::Utc::now();
                self.users.update_profile(&existing).await
            }
            None => {
                let user = LocalUser::from_identity(identity);
                tracing::info!(user_id = %user.id, external_id = %user.external_id, "provisioned user from verified identity");
                self.users.insert(&user).await
            }
        }
    }
}
