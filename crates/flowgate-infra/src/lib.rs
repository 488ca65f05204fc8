//! Infrastructure implementations for Flowgate.
//!
//! Concrete implementations of the trait seams defined in `flowgate-core`:
//! the file-backed signing-key store, the HTTP identity verifier, the
//! workflow-engine adapter and login exchange, and the SQLite user
//! repository.

pub mod config;
pub mod engine;
pub mod identity;
pub mod keys;
pub mod sqlite;
