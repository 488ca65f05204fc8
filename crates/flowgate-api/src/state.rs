//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over verifier/repository/key-store/login traits, but
//! AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use flowgate_core::engine::verify_interface;
use flowgate_core::federation::FederationExchanger;
use flowgate_core::token::TokenForge;
use flowgate_infra::config::{load_settings, resolve_data_dir};
use flowgate_infra::engine::{EngineProxy, HttpEngineAdapter, HttpLoginExchange};
use flowgate_infra::identity::HttpIdentityVerifier;
use flowgate_infra::keys::FileKeyStore;
use flowgate_infra::sqlite::pool::DatabasePool;
use flowgate_infra::sqlite::SqliteUserRepository;
use flowgate_types::config::FederationSettings;

/// Concrete type alias for the exchanger generics pinned to infra implementations.
pub type ConcreteExchanger = FederationExchanger<
    HttpIdentityVerifier,
    SqliteUserRepository,
    Arc<FileKeyStore>,
    HttpLoginExchange,
>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub exchanger: Arc<ConcreteExchanger>,
    pub key_store: Arc<FileKeyStore>,
    /// Engine REST adapter; absent when the engine is not configured.
    pub engine: Option<Arc<HttpEngineAdapter>>,
    /// Pass-through proxy; absent when the engine is not configured.
    pub proxy: Option<Arc<EngineProxy>>,
    pub settings: FederationSettings,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let settings = load_settings(&data_dir).await;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("flowgate.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // Signing-key store: configured dir first, else the data dir, then
        // the store's own fallback chain.
        let primary_keys_dir = settings
            .keys_dir
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.clone());
        let key_store = Arc::new(FileKeyStore::new(Some(primary_keys_dir)));

        // Identity verification is delegated entirely to the provider.
        if settings.identity_verify_url.is_none() {
            tracing::warn!(
                "identity_verify_url is not configured; all bearer tokens will be rejected"
            );
        }
        let verifier = HttpIdentityVerifier::new(settings.identity_verify_url.clone())?;

        let forge = TokenForge::with_ttl(
            key_store.clone(),
            Duration::from_secs(settings.assertion_ttl_secs),
        );

        let exchanger = FederationExchanger::new(
            verifier,
            SqliteUserRepository::new(db_pool.clone()),
            forge,
            HttpLoginExchange::new()?,
            settings.engine_base_url.clone(),
            settings.externally_hosted,
            settings.default_project_id.clone(),
        );

        // Decide engine availability once and log the decision.
        let (engine, proxy) = if exchanger.engine_enabled() {
            let base_url = settings
                .engine_base_url
                .clone()
                .unwrap_or_default();
            tracing::info!(engine = %base_url, "workflow engine configured");

            let api_key = settings.engine_api_key.clone();
            let engine = match &api_key {
                Some(key) => {
                    let adapter =
                        HttpEngineAdapter::new(base_url.clone(), SecretString::from(key.clone()))?;
                    verify_interface(&adapter)?;
                    Some(Arc::new(adapter))
                }
                None => {
                    tracing::warn!(
                        "engine_api_key is not configured; named engine routes are disabled"
                    );
                    None
                }
            };
            let proxy = Some(Arc::new(EngineProxy::new(
                base_url,
                api_key.map(SecretString::from),
            )?));
            (engine, proxy)
        } else {
            tracing::info!("workflow engine not configured; federation is identity-only");
            (None, None)
        };

        Ok(Self {
            exchanger: Arc::new(exchanger),
            key_store,
            engine,
            proxy,
            settings,
            data_dir,
            db_pool,
        })
    }
}
