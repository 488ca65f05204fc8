//! Assertion JWT minting.
//!
//! The workflow engine accepts a short-lived RS256 "external token" whose
//! payload follows the engine's v3 managed-authentication contract. The
//! wire field names here are that contract; changing them breaks the
//! engine-side verification, so they are pinned with serde renames.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use flowgate_types::error::TokenError;
use flowgate_types::identity::{EngineRole, LocalUser};

use crate::keys::SigningKeyStore;

/// Default assertion lifetime. Assertions are exchanged once, immediately
/// after minting, so the window stays small.
pub const DEFAULT_ASSERTION_TTL: Duration = Duration::from_secs(300);

/// The v3 external-token payload the engine verifies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Contract version, always "v3".
    pub version: String,
    /// Stable user identifier on our side (the local user id).
    #[serde(rename = "externalUserId")]
    pub external_user_id: String,
    /// Engine project the session is scoped to.
    #[serde(rename = "externalProjectId")]
    pub external_project_id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub role: EngineRole,
    /// Engine-side piece filtering. "NONE" grants the full catalog.
    #[serde(rename = "piecesFilterType")]
    pub pieces_filter_type: String,
    pub iat: i64,
    pub exp: i64,
}

/// A minted assertion plus the metadata callers surface alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct SignedAssertion {
    pub token: String,
    /// The `kid` the token was signed under.
    pub key_id: String,
    /// Unix timestamp the token stops being valid.
    pub expires_at: i64,
}

/// Mints engine assertion tokens from the active signing key.
///
/// Generic over the key store trait so core stays free of file and crypto
/// IO concerns.
pub struct TokenForge<K: SigningKeyStore> {
    key_store: K,
    ttl: Duration,
}

impl<K: SigningKeyStore> TokenForge<K> {
    pub fn new(key_store: K) -> Self {
        Self::with_ttl(key_store, DEFAULT_ASSERTION_TTL)
    }

    pub fn with_ttl(key_store: K, ttl: Duration) -> Self {
        Self { key_store, ttl }
    }

    /// Mint an assertion for a user with their default role
    /// (admin -> ADMIN, otherwise EDITOR).
    pub async fn mint_for_user(
        &self,
        user: &LocalUser,
        project_id: &str,
    ) -> Result<SignedAssertion, TokenError> {
        self.mint(user, project_id, user.engine_role()).await
    }

    /// Mint an assertion with an explicit role override.
    pub async fn mint(
        &self,
        user: &LocalUser,
        project_id: &str,
        role: EngineRole,
    ) -> Result<SignedAssertion, TokenError> {
        let key = self.key_store.get_or_create_active().await?;

        let iat = Utc::now().timestamp();
        let exp = iat + self.ttl.as_secs() as i64;
        let claims = AssertionClaims {
            version: "v3".to_string(),
            external_user_id: user.id.to_string(),
            external_project_id: project_id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role,
            pieces_filter_type: "NONE".to_string(),
            iat,
            exp,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(key.key_id.clone());

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        let token = jsonwebtoken::encode(&header, &claims, &encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        tracing::debug!(
            user_id = %user.id,
            project_id,
            role = %role,
            kid = %key.key_id,
            "minted engine assertion"
        );

        Ok(SignedAssertion {
            token,
            key_id: key.key_id,
            expires_at: exp,
        })
    }
}

/// Parse a caller-supplied role string. Unknown roles are the caller's
/// mistake and never coerced to a default.
pub fn role_from_str(s: &str) -> Result<EngineRole, TokenError> {
    s.parse().map_err(|_| TokenError::InvalidRole(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use jsonwebtoken::{DecodingKey, Validation};
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
    use rsa::RsaPrivateKey;

    use flowgate_types::error::KeyStoreError;
    use flowgate_types::identity::VerifiedIdentity;
    use flowgate_types::key::{PublicKeyInfo, SigningKey};

    struct FixedKeyStore {
        key: SigningKey,
    }

    impl SigningKeyStore for FixedKeyStore {
        async fn get_or_create_active(&self) -> Result<SigningKey, KeyStoreError> {
            Ok(self.key.clone())
        }

        async fn public_key(&self) -> Result<PublicKeyInfo, KeyStoreError> {
            Ok(self.key.public_info())
        }
    }

    fn test_key() -> SigningKey {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, 2048).unwrap();
        let private_pem = private.to_pkcs8_pem(LineEnding::LF).unwrap().to_string();
        let public_pem = private
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap();
        SigningKey {
            key_id: "flowgate-key-20260101000000".to_string(),
            private_key: private_pem,
            public_key: public_pem,
            created_at: Utc::now(),
        }
    }

    fn test_user() -> LocalUser {
        LocalUser::from_identity(&VerifiedIdentity {
            subject_id: "sub-123".to_string(),
            email: "ada@example.com".to_string(),
            email_verified: true,
            display_name: Some("Ada Lovelace".to_string()),
            picture: None,
            tenant_id: None,
        })
    }

    fn decode(assertion: &SignedAssertion, key: &SigningKey) -> AssertionClaims {
        let decoding_key = DecodingKey::from_rsa_pem(key.public_key.as_bytes()).unwrap();
        let validation = Validation::new(Algorithm::RS256);
        jsonwebtoken::decode::<AssertionClaims>(&assertion.token, &decoding_key, &validation)
            .unwrap()
            .claims
    }

    #[tokio::test]
    async fn test_assertion_roundtrip_v3_contract() {
        let key = test_key();
        let forge = TokenForge::new(FixedKeyStore { key: key.clone() });
        let user = test_user();

        let assertion = forge.mint_for_user(&user, "proj-1").await.unwrap();

        let header = jsonwebtoken::decode_header(&assertion.token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some(key.key_id.as_str()));
        assert_eq!(assertion.key_id, key.key_id);

        let claims = decode(&assertion, &key);
        assert_eq!(claims.version, "v3");
        assert_eq!(claims.external_user_id, user.id.to_string());
        assert_eq!(claims.external_project_id, "proj-1");
        assert_eq!(claims.first_name, "Ada");
        assert_eq!(claims.last_name, "Lovelace");
        assert_eq!(claims.role, EngineRole::Editor);
        assert_eq!(claims.pieces_filter_type, "NONE");
    }

    #[tokio::test]
    async fn test_default_ttl_is_five_minutes() {
        let key = test_key();
        let forge = TokenForge::new(FixedKeyStore { key: key.clone() });

        let assertion = forge.mint_for_user(&test_user(), "proj-1").await.unwrap();
        let claims = decode(&assertion, &key);
        assert_eq!(claims.exp - claims.iat, 300);
        assert_eq!(assertion.expires_at, claims.exp);
    }

    #[tokio::test]
    async fn test_explicit_viewer_role_override() {
        let key = test_key();
        let forge = TokenForge::new(FixedKeyStore { key: key.clone() });

        let assertion = forge
            .mint(&test_user(), "proj-1", EngineRole::Viewer)
            .await
            .unwrap();
        let claims = decode(&assertion, &key);
        assert_eq!(claims.role, EngineRole::Viewer);
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[tokio::test]
    async fn test_admin_user_gets_admin_role() {
        let key = test_key();
        let forge = TokenForge::new(FixedKeyStore { key: key.clone() });
        let mut user = test_user();
        user.is_admin = true;

        let assertion = forge.mint_for_user(&user, "proj-1").await.unwrap();
        assert_eq!(decode(&assertion, &key).role, EngineRole::Admin);
    }

    #[test]
    fn test_wire_field_names_pinned() {
        let claims = AssertionClaims {
            version: "v3".to_string(),
            external_user_id: "u1".to_string(),
            external_project_id: "p1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: EngineRole::Editor,
            pieces_filter_type: "NONE".to_string(),
            iat: 0,
            exp: 300,
        };
        let json = serde_json::to_value(&claims).unwrap();
        for field in [
            "version",
            "externalUserId",
            "externalProjectId",
            "firstName",
            "lastName",
            "role",
            "piecesFilterType",
            "iat",
            "exp",
        ] {
            assert!(json.get(field).is_some(), "missing wire field {field}");
        }
        assert_eq!(json["role"], "EDITOR");
    }

    #[test]
    fn test_role_from_str_rejects_unknown() {
        assert!(role_from_str("ADMIN").is_ok());
        let err = role_from_str("owner").unwrap_err();
        assert!(matches!(err, TokenError::InvalidRole(_)));
    }
}
