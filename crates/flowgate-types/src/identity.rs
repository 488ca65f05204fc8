//! Identity types: claims verified by the primary identity provider,
//! the locally provisioned user record, and the engine role vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Claims returned by the primary identity provider after verifying a
/// bearer token. Never persisted -- used to resolve or provision a
/// [`LocalUser`] and then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// The provider's stable subject identifier for this user.
    pub subject_id: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    /// Freeform display name as the provider reports it.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Avatar URL, if the provider has one.
    #[serde(default)]
    pub picture: Option<String>,
    /// Tenant identifier for multi-tenant deployments.
    #[serde(default)]
    pub tenant_id: Option<String>,
}

impl VerifiedIdentity {
    /// Split the provider display name into (first, last) parts.
    ///
    /// "Ada Lovelace" -> ("Ada", "Lovelace"); a single word becomes the
    /// first name with an empty last name.
    pub fn name_parts(&self) -> (String, String) {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => {
                let mut parts = name.trim().splitn(2, ' ');
                let first = parts.next().unwrap_or("").to_string();
                let last = parts.next().unwrap_or("").trim().to_string();
                (first, last)
            }
            _ => (String::new(), String::new()),
        }
    }
}

/// A user provisioned from a verified external identity.
///
/// Authentication itself is owned by the primary identity provider; this
/// record stores profile data and links to the provider via `external_id`.
/// The federation layer only reads and creates these records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalUser {
    pub id: Uuid,
    /// The identity provider's subject id (unique per user).
    pub external_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl LocalUser {
    /// Provision a new user from verified claims. The caller assigns
    /// timestamps via `created_at`/`updated_at` (both set to now here).
    pub fn from_identity(identity: &VerifiedIdentity) -> Self {
        let (first_name, last_name) = identity.name_parts();
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            external_id: identity.subject_id.clone(),
            email: identity.email.clone(),
            first_name,
            last_name,
            display_name: identity.display_name.clone(),
            avatar_url: identity.picture.clone(),
            tenant_id: identity.tenant_id.clone(),
            is_active: true,
            is_admin: false,
            created_at: now,
            updated_at: now,
            last_login_at: Some(now),
        }
    }

    /// The engine role this user is granted by default.
    ///
    /// Two-tier mapping: admins get full engine access, everyone else can
    /// edit. VIEWER is only ever an explicit caller override.
    pub fn engine_role(&self) -> EngineRole {
        if self.is_admin {
            EngineRole::Admin
        } else {
            EngineRole::Editor
        }
    }
}

/// Role vocabulary of the engine's embedding contract.
///
/// The wire form is uppercase (`ADMIN`/`EDITOR`/`VIEWER`). Unknown role
/// strings are a caller error, never coerced to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EngineRole {
    Admin,
    Editor,
    Viewer,
}

impl fmt::Display for EngineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineRole::Admin => write!(f, "ADMIN"),
            EngineRole::Editor => write!(f, "EDITOR"),
            EngineRole::Viewer => write!(f, "VIEWER"),
        }
    }
}

impl FromStr for EngineRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(EngineRole::Admin),
            "EDITOR" => Ok(EngineRole::Editor),
            "VIEWER" => Ok(EngineRole::Viewer),
            other => Err(format!("invalid engine role: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(display_name: Option<&str>) -> VerifiedIdentity {
        VerifiedIdentity {
            subject_id: "sub-123".to_string(),
            email: "ada@example.com".to_string(),
            email_verified: true,
            display_name: display_name.map(String::from),
            picture: None,
            tenant_id: None,
        }
    }

    #[test]
    fn test_name_parts_two_words() {
        let (first, last) = identity(Some("Ada Lovelace")).name_parts();
        assert_eq!(first, "Ada");
        assert_eq!(last, "Lovelace");
    }

    #[test]
    fn test_name_parts_single_word() {
        let (first, last) = identity(Some("Ada")).name_parts();
        assert_eq!(first, "Ada");
        assert_eq!(last, "");
    }

    #[test]
    fn test_name_parts_multi_word_last_name() {
        let (first, last) = identity(Some("Ada King Lovelace")).name_parts();
        assert_eq!(first, "Ada");
        assert_eq!(last, "King Lovelace");
    }

    #[test]
    fn test_name_parts_missing() {
        let (first, last) = identity(None).name_parts();
        assert_eq!(first, "");
        assert_eq!(last, "");
    }

    #[test]
    fn test_from_identity_provisions_active_non_admin() {
        let user = LocalUser::from_identity(&identity(Some("Ada Lovelace")));
        assert_eq!(user.external_id, "sub-123");
        assert_eq!(user.email, "ada@example.com");
        assert!(user.is_active);
        assert!(!user.is_admin);
        assert!(user.last_login_at.is_some());
    }

    #[test]
    fn test_engine_role_mapping() {
        let mut user = LocalUser::from_identity(&identity(None));
        assert_eq!(user.engine_role(), EngineRole::Editor);
        user.is_admin = true;
        assert_eq!(user.engine_role(), EngineRole::Admin);
    }

    #[test]
    fn test_engine_role_roundtrip() {
        for role in [EngineRole::Admin, EngineRole::Editor, EngineRole::Viewer] {
            assert_eq!(role.to_string().parse::<EngineRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_engine_role_rejects_unknown() {
        assert!("editor".parse::<EngineRole>().is_err());
        assert!("OWNER".parse::<EngineRole>().is_err());
    }
}
