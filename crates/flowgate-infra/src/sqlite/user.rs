//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `flowgate-core` using sqlx with split read/write pools.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use flowgate_core::repository::UserRepository;
use flowgate_types::error::RepositoryError;
use flowgate_types::identity::LocalUser;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain LocalUser.
struct UserRow {
    id: String,
    external_id: String,
    email: String,
    first_name: String,
    last_name: String,
    display_name: Option<String>,
    avatar_url: Option<String>,
    tenant_id: Option<String>,
    is_active: i64,
    is_admin: i64,
    created_at: String,
    updated_at: String,
    last_login_at: Option<String>,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            external_id: row.try_get("external_id")?,
            email: row.try_get("email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            display_name: row.try_get("display_name")?,
            avatar_url: row.try_get("avatar_url")?,
            tenant_id: row.try_get("tenant_id")?,
            is_active: row.try_get("is_active")?,
            is_admin: row.try_get("is_admin")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            last_login_at: row.try_get("last_login_at")?,
        })
    }

    fn into_user(self) -> Result<LocalUser, RepositoryError> {
        let id = self
            .id
            .parse::<Uuid>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;

        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;
        let last_login_at = self
            .last_login_at
            .as_deref()
            .map(parse_datetime)
            .transpose()?;

        Ok(LocalUser {
            id,
            external_id: self.external_id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            display_name: self.display_name,
            avatar_url: self.avatar_url,
            tenant_id: self.tenant_id,
            is_active: self.is_active != 0,
            is_admin: self.is_admin != 0,
            created_at,
            updated_at,
            last_login_at,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl UserRepository for SqliteUserRepository {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<LocalUser>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE external_id = ?")
            .bind(external_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<LocalUser>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, user: &LocalUser) -> Result<LocalUser, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (id, external_id, email, first_name, last_name, display_name, avatar_url, tenant_id, is_active, is_admin, created_at, updated_at, last_login_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.external_id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .bind(&user.tenant_id)
        .bind(user.is_active as i64)
        .bind(user.is_admin as i64)
        .bind(format_datetime(&user.created_at))
        .bind(format_datetime(&user.updated_at))
        .bind(user.last_login_at.as_ref().map(format_datetime))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(user.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "external id '{}' already exists",
                    user.external_id
                )))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn update_profile(&self, user: &LocalUser) -> Result<LocalUser, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET email = ?, first_name = ?, last_name = ?, display_name = ?, avatar_url = ?, tenant_id = ?, updated_at = ?, last_login_at = ?
             WHERE external_id = ?",
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .bind(&user.tenant_id)
        .bind(format_datetime(&user.updated_at))
        .bind(user.last_login_at.as_ref().map(format_datetime))
        .bind(&user.external_id)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgate_types::identity::VerifiedIdentity;

    async fn test_pool() -> (tempfile::TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, pool)
    }

    fn test_user(external_id: &str) -> LocalUser {
        LocalUser::from_identity(&VerifiedIdentity {
            subject_id: external_id.to_string(),
            email: format!("{external_id}@example.com"),
            email_verified: true,
            display_name: Some("Ada Lovelace".to_string()),
            picture: Some("https://example.com/a.png".to_string()),
            tenant_id: None,
        })
    }

    #[tokio::test]
    async fn test_insert_and_find_roundtrip() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteUserRepository::new(pool);
        let user = test_user("sub-1");

        repo.insert(&user).await.unwrap();

        let found = repo.find_by_external_id("sub-1").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.email, "sub-1@example.com");
        assert_eq!(found.first_name, "Ada");
        assert!(found.is_active);
        assert!(!found.is_admin);

        let by_id = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.external_id, "sub-1");
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteUserRepository::new(pool);
        assert!(repo.find_by_external_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_external_id_conflicts() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        repo.insert(&test_user("sub-1")).await.unwrap();
        let err = repo.insert(&test_user("sub-1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_profile_refreshes_fields() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let mut user = test_user("sub-1");
        repo.insert(&user).await.unwrap();

        user.email = "countess@example.com".to_string();
        user.last_login_at = Some(Utc::now());
        repo.update_profile(&user).await.unwrap();

        let found = repo.find_by_external_id("sub-1").await.unwrap().unwrap();
        assert_eq!(found.email, "countess@example.com");
        assert!(found.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_user_not_found() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let err = repo.update_profile(&test_user("ghost")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
