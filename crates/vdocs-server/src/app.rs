//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{security, trailing_slash};
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/navigation/{version}",
            get(handlers::navigation::get_navigation),
        )
        .route("/{version}", get(handlers::documents::get_version_root))
        .route("/{version}/{*path}", get(handlers::documents::get_document))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer())
                .layer(axum::middleware::from_fn(
                    trailing_slash::redirect_trailing_slash,
                )),
        )
        .with_state(state)
}
