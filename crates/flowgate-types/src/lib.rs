//! Shared domain types for Flowgate.
//!
//! This crate contains the core domain types used across the Flowgate
//! federation service: verified identities, local users, signing keys,
//! workflow-engine descriptors, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod key;
