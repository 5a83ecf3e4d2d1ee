//! Application route configuration.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{profile_routes, public_routes, session_routes};
use super::middleware::auth_middleware;
use super::AppState;
use crate::config::HOME_PATH;

/// Create the application router with all routes configured.
///
/// Everything lives under `/home`; the public routes (sign-up, login,
/// password reset) bypass the auth middleware, all others require a
/// principal.
pub fn create_router(state: AppState) -> Router {
    let protected = profile_routes()
        .merge(session_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .nest(HOME_PATH, public_routes().merge(protected))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health() -> &'static str {
    "ok"
}
