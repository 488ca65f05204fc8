//! Identity provider seam.

pub mod verifier;

pub use verifier::IdentityVerifier;
