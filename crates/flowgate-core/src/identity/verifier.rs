//! IdentityVerifier trait definition.

use flowgate_types::error::AuthError;
use flowgate_types::identity::VerifiedIdentity;

/// Trait for verifying bearer tokens with the primary identity provider.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
/// Implementations live in flowgate-infra (e.g., `HttpIdentityVerifier`).
///
/// Verification is all-or-nothing: any failure (bad token, expired token,
/// provider outage) surfaces as [`AuthError::InvalidToken`]. Callers never
/// learn whether the token or the provider was at fault.
pub trait IdentityVerifier: Send + Sync {
    /// Verify a raw bearer token and return the provider's claims.
    fn verify(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<VerifiedIdentity, AuthError>> + Send;
}
