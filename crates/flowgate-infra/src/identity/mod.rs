//! Identity provider integration.

pub mod http_verifier;

pub use http_verifier::HttpIdentityVerifier;
