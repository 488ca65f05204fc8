//! Signing-key persistence.

pub mod file_store;

pub use file_store::FileKeyStore;
