//! REST API handlers.

pub mod auth;
pub mod engine;
pub mod proxy;
pub mod workflow;
