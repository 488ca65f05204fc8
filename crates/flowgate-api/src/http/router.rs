//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{any, delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Identity federation
        .route("/auth/verify", post(handlers::auth::verify))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/engine-token", get(handlers::auth::engine_token))
        // Engine embedding
        .route("/engine/public-key", get(handlers::engine::public_key))
        .route("/engine/embed-token", get(handlers::engine::embed_token))
        // Workflows via the abstraction layer
        .route("/engine/workflows", post(handlers::workflow::create_workflow))
        .route("/engine/workflows", get(handlers::workflow::list_workflows))
        .route("/engine/workflows/{id}", get(handlers::workflow::get_workflow))
        .route(
            "/engine/workflows/{id}/status",
            put(handlers::workflow::update_workflow_status),
        )
        .route(
            "/engine/workflows/{id}",
            delete(handlers::workflow::delete_workflow),
        )
        .route(
            "/engine/workflows/{id}/execute",
            post(handlers::workflow::execute_workflow),
        )
        .route(
            "/engine/executions",
            get(handlers::workflow::list_executions),
        )
        .route(
            "/engine/executions/{id}",
            get(handlers::workflow::get_execution),
        )
        // Pass-through for engine surface without a named route
        .route("/engine/proxy/{*path}", any(handlers::proxy::forward));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
