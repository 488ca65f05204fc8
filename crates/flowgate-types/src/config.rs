//! Federation configuration types.
//!
//! `FederationSettings` represents the top-level `config.toml` that controls
//! the identity provider boundary, the workflow engine connection, and the
//! signing-key store location. All fields have sensible defaults so a bare
//! deployment starts (with the engine treated as unconfigured).

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Flowgate service.
///
/// Loaded from `{data_dir}/config.toml`, with `FLOWGATE_*` environment
/// variables taking precedence for deployment overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationSettings {
    /// Base URL of the embedded workflow engine (e.g. "http://engine:80").
    /// Empty/absent means the engine is unconfigured and federation skips
    /// the session exchange.
    #[serde(default)]
    pub engine_base_url: Option<String>,

    /// Service API key for non-user-scoped engine REST operations.
    #[serde(default)]
    pub engine_api_key: Option<String>,

    /// Identity provider token-verification endpoint URL.
    #[serde(default)]
    pub identity_verify_url: Option<String>,

    /// Whether this deployment runs on an externally hosted platform.
    /// When true, a loopback/internal engine URL is treated as a stale
    /// placeholder and the engine is considered unavailable.
    #[serde(default)]
    pub externally_hosted: bool,

    /// Directory for the signing-key record. Absent means the data dir.
    #[serde(default)]
    pub keys_dir: Option<String>,

    /// Engine project to scope assertions to when the caller does not
    /// specify one.
    #[serde(default = "default_project_id")]
    pub default_project_id: String,

    /// Assertion token lifetime in seconds. Provisioning tokens are
    /// single-use, so this stays small.
    #[serde(default = "default_assertion_ttl_secs")]
    pub assertion_ttl_secs: u64,
}

fn default_project_id() -> String {
    "default".to_string()
}

fn default_assertion_ttl_secs() -> u64 {
    300
}

impl Default for FederationSettings {
    fn default() -> Self {
        Self {
            engine_base_url: None,
            engine_api_key: None,
            identity_verify_url: None,
            externally_hosted: false,
            keys_dir: None,
            default_project_id: default_project_id(),
            assertion_ttl_secs: default_assertion_ttl_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = FederationSettings::default();
        assert!(settings.engine_base_url.is_none());
        assert!(!settings.externally_hosted);
        assert_eq!(settings.default_project_id, "default");
        assert_eq!(settings.assertion_ttl_secs, 300);
    }

    #[test]
    fn test_settings_deserialize_empty_toml() {
        let settings: FederationSettings = toml::from_str("").unwrap();
        assert!(settings.engine_base_url.is_none());
        assert_eq!(settings.assertion_ttl_secs, 300);
    }

    #[test]
    fn test_settings_deserialize_with_values() {
        let toml_str = r#"
engine_base_url = "http://engine:80"
engine_api_key = "svc-key"
identity_verify_url = "https://idp.example.com/v1/accounts:lookup"
externally_hosted = true
default_project_id = "workspace-1"
assertion_ttl_secs = 120
"#;
        let settings: FederationSettings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.engine_base_url.as_deref(), Some("http://engine:80"));
        assert!(settings.externally_hosted);
        assert_eq!(settings.default_project_id, "workspace-1");
        assert_eq!(settings.assertion_ttl_secs, 120);
    }

    #[test]
    fn test_settings_serde_roundtrip() {
        let settings = FederationSettings {
            engine_base_url: Some("https://flows.example.com".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: FederationSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.engine_base_url.as_deref(),
            Some("https://flows.example.com")
        );
    }
}
