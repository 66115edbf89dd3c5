//! # Orchestrator Web API
//!
//! REST surface over the pipeline orchestrator. Thin request/response
//! plumbing: handlers validate input, call the orchestrator, and shape the
//! response; all sequencing, retry, and cancellation logic lives in
//! `crate::orchestration`.

use axum::Router;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod errors;
pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Create the web application with all routes and middleware.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::pipeline_routes())
        .merge(routes::observability_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    info!("Web application created with all routes and middleware");
    app
}
