//! Assertion-token minting.

pub mod forge;

pub use forge::{role_from_str, AssertionClaims, SignedAssertion, TokenForge, DEFAULT_ASSERTION_TTL};
