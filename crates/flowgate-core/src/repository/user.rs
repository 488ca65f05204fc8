//! User repository trait definition.

use flowgate_types::error::RepositoryError;
use flowgate_types::identity::LocalUser;
use uuid::Uuid;

/// Repository trait for locally provisioned users.
///
/// Implementations live in flowgate-infra (e.g., SqliteUserRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait UserRepository: Send + Sync {
    /// Look up a user by the identity provider's subject id.
    fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<LocalUser>, RepositoryError>> + Send;

    /// Look up a user by local id.
    fn find_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<LocalUser>, RepositoryError>> + Send;

    /// Insert a newly provisioned user. Returns the stored record.
    fn insert(
        &self,
        user: &LocalUser,
    ) -> impl std::future::Future<Output = Result<LocalUser, RepositoryError>> + Send;

    /// Refresh profile fields and the last-login timestamp on an existing
    /// user. Returns the updated record.
    fn update_profile(
        &self,
        user: &LocalUser,
    ) -> impl std::future::Future<Output = Result<LocalUser, RepositoryError>> + Send;
}
