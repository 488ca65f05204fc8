//! Federation logic and trait definitions for Flowgate.
//!
//! This crate defines the "ports" (identity, persistence, key storage, and
//! engine traits) that the infrastructure layer implements. It depends only
//! on `flowgate-types` -- never on `flowgate-infra` or any network/IO crate.

pub mod engine;
pub mod federation;
pub mod identity;
pub mod keys;
pub mod repository;
pub mod token;
