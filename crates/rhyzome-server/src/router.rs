//! Router construction.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{health, microblogs, relations, tokens};
use crate::state::AppState;

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/tokens", post(tokens::issue))
        .route(
            "/microblogs",
            get(microblogs::list).post(microblogs::create),
        )
        .route("/microblogs/all", get(microblogs::all_values))
        .route(
            "/microblogs/:id",
            get(microblogs::get).delete(microblogs::delete),
        )
        .route("/microblogs/:id/walk", get(relations::walk))
        .route("/microblogs/:id/relations", get(relations::list))
        .route(
            "/microblogs/:id/relations/:name",
            post(relations::create).delete(relations::delete_by_name),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
