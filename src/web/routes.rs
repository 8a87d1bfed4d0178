//! Web API router construction.

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;
use crate::web::middleware::request_log::RequestLogLayer;
use crate::web::{diplomas, status};

/// Creates the web server router
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(status::health))
        .route("/status", get(status::status))
        .route("/diplomas", get(diplomas::list_diplomas))
        .route("/diplomas/mentors", get(diplomas::list_mentors))
        .with_state(app_state)
        .layer((
            // Outermost, so preflight responses are logged too.
            RequestLogLayer,
            cors,
        ))
}
