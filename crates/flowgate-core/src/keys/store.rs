//! SigningKeyStore trait definition.

use flowgate_types::error::KeyStoreError;
use flowgate_types::key::{PublicKeyInfo, SigningKey};

/// Trait for obtaining the active assertion-signing keypair.
///
/// Implementations live in flowgate-infra (e.g., `FileKeyStore`). There is
/// exactly one active key at a time; `get_or_create_active` is idempotent
/// and safe to call concurrently from multiple processes.
pub trait SigningKeyStore: Send + Sync {
    /// Return the active signing key, creating and persisting one if none
    /// exists yet.
    fn get_or_create_active(
        &self,
    ) -> impl std::future::Future<Output = Result<SigningKey, KeyStoreError>> + Send;

    /// The publishable half of the active key.
    fn public_key(
        &self,
    ) -> impl std::future::Future<Output = Result<PublicKeyInfo, KeyStoreError>> + Send;
}

// A shared store behind an Arc is still a store, so the forge and the
// public-key endpoint can hold the same instance.
impl<S: SigningKeyStore> SigningKeyStore for std::sync::Arc<S> {
    async fn get_or_create_active(&self) -> Result<SigningKey, KeyStoreError> {
        (**self).get_or_create_active().await
    }

    async fn public_key(&self) -> Result<PublicKeyInfo, KeyStoreError> {
        (**self).public_key().await
    }
}
