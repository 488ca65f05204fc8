use thiserror::Error;

/// Errors from primary-identity verification.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid or expired identity token")]
    InvalidToken,

    #[error("no bearer token provided")]
    MissingToken,
}

/// Errors from the signing-key store.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("no writable location for signing key material")]
    StorageUnavailable,

    #[error("key generation failed: {0}")]
    Generation(String),

    #[error("corrupt key record: {0}")]
    CorruptRecord(String),

    #[error("cannot read key record: {0}")]
    Unreadable(String),
}

/// Errors from assertion-token minting.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Key(#[from] KeyStoreError),

    #[error("invalid engine role: '{0}'")]
    InvalidRole(String),

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Errors from the assertion-for-session exchange with the workflow engine.
///
/// These are recoverable by design: a federation failure never invalidates
/// the local identity that preceded it.
#[derive(Debug, Error)]
pub enum FederationError {
    #[error("workflow engine is not configured")]
    NotConfigured,

    #[error("engine rejected the assertion: HTTP {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("could not reach the workflow engine: {0}")]
    Transport(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Errors from workflow-engine REST and pass-through operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine could not be reached, or answered with a gateway-class
    /// status (502/503/504). `status` is absent for pure connection failures.
    #[error("workflow engine unreachable{}: {detail}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Unreachable { status: Option<u16>, detail: String },

    #[error("engine returned HTTP {status}: {detail}")]
    Engine { status: u16, detail: String },

    #[error("entity not found in engine")]
    NotFound,

    #[error("failed to parse engine response: {0}")]
    Deserialization(String),

    #[error("engine client '{client}' is missing operations: {missing:?}")]
    InterfaceViolation {
        client: String,
        missing: Vec<String>,
    },
}

/// Errors from repository operations (used by trait definitions in flowgate-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
