//! HTTP/REST API layer for Flowgate.
//!
//! Axum-based REST API at `/api/v1/` with bearer-token authentication
//! against the identity provider, envelope response format, and CORS
//! support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
