//! HTTP API route definitions.

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::error::handle_panic;
use super::handlers::{health, index, not_found, AppState};
use crate::metrics::track_requests;

/// Create the API router.
///
/// Only `GET` is served on known paths; every other method or path falls
/// through to the JSON 404. `HEAD` is routed explicitly since `get` would
/// otherwise answer it.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(index).head(not_found).fallback(not_found))
        .route("/health", get(health).head(not_found).fallback(not_found))
        .fallback(not_found)
        .with_state(state);

    with_middleware(routes)
}

/// Wrap `router` with tracing, request metrics and panic recovery.
pub(crate) fn with_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(track_requests))
            .layer(CatchPanicLayer::custom(handle_panic)),
    )
}
