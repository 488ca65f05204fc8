//! Workflow-engine HTTP integration.

pub mod adapter;
pub mod login;
pub mod proxy;
pub mod types;

pub use adapter::HttpEngineAdapter;
pub use login::HttpLoginExchange;
pub use proxy::{EngineProxy, ProxiedRequest, ProxiedResponse};
