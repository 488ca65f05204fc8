//! Configuration loader for Flowgate.
//!
//! Reads `config.toml` from the data directory (`~/.flowgate/` in production)
//! and deserializes it into [`FederationSettings`]. Environment variables
//! prefixed `FLOWGATE_` override file values so deployments can configure
//! the engine connection without editing files.

use std::path::{Path, PathBuf};

use flowgate_types::config::FederationSettings;

/// Resolve the Flowgate data directory.
///
/// Priority: `FLOWGATE_DATA_DIR` env var, then `~/.flowgate`, then
/// `./.flowgate` when no home directory is known.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FLOWGATE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".flowgate"),
        None => PathBuf::from(".flowgate"),
    }
}

/// Load settings from `{data_dir}/config.toml`, then apply env overrides.
///
/// - Missing file: defaults (engine unconfigured).
/// - Unparseable file: logs a warning and uses defaults.
pub async fn load_settings(data_dir: &Path) -> FederationSettings {
    let config_path = data_dir.join("config.toml");

    let mut settings = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => match toml::from_str::<FederationSettings>(&content) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(
                    "Failed to parse {}: {err}, using defaults",
                    config_path.display()
                );
                FederationSettings::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            FederationSettings::default()
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            FederationSettings::default()
        }
    };

    apply_env_overrides(&mut settings);
    settings
}

fn apply_env_overrides(settings: &mut FederationSettings) {
    if let Ok(url) = std::env::var("FLOWGATE_ENGINE_BASE_URL") {
        settings.engine_base_url = non_empty(url);
    }
    if let Ok(key) = std::env::var("FLOWGATE_ENGINE_API_KEY") {
        settings.engine_api_key = non_empty(key);
    }
    if let Ok(url) = std::env::var("FLOWGATE_IDENTITY_VERIFY_URL") {
        settings.identity_verify_url = non_empty(url);
    }
    if let Ok(hosted) = std::env::var("FLOWGATE_EXTERNALLY_HOSTED") {
        settings.externally_hosted = matches!(hosted.as_str(), "1" | "true" | "yes");
    }
    if let Ok(dir) = std::env::var("FLOWGATE_KEYS_DIR") {
        settings.keys_dir = non_empty(dir);
    }
    if let Ok(project) = std::env::var("FLOWGATE_DEFAULT_PROJECT_ID") {
        if let Some(project) = non_empty(project) {
            settings.default_project_id = project;
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_settings_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let settings = load_settings(tmp.path()).await;
        assert!(settings.engine_base_url.is_none());
        assert_eq!(settings.assertion_ttl_secs, 300);
    }

    #[tokio::test]
    async fn load_settings_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
engine_base_url = "http://engine:80"
default_project_id = "workspace-1"
"#,
        )
        .await
        .unwrap();

        let settings = load_settings(tmp.path()).await;
        assert_eq!(settings.engine_base_url.as_deref(), Some("http://engine:80"));
        assert_eq!(settings.default_project_id, "workspace-1");
    }

    #[tokio::test]
    async fn load_settings_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let settings = load_settings(tmp.path()).await;
        assert!(settings.engine_base_url.is_none());
        assert_eq!(settings.default_project_id, "default");
    }

    #[test]
    fn non_empty_trims_and_filters() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(" x ".to_string()), Some("x".to_string()));
    }
}
