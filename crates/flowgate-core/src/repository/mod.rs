//! Repository trait definitions.
//!
//! Implementations live in flowgate-infra.

pub mod user;

pub use user::UserRepository;
