//! Signing-key storage seam.

pub mod store;

pub use store::SigningKeyStore;
