//! HTTP route handlers for the portal API.
//!
//! - `hierarchy`: generic tree endpoints, mounted for organizations and menus
//! - `books`: flat, paginated book CRUD
//! - `health`: liveness, readiness, metrics and version endpoints

pub mod books;
pub mod health;
pub mod hierarchy;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::security_headers::security_headers_middleware;
use crate::state::AppState;
use crate::types::{MenuPayload, OrganizationPayload};

/// Builds the complete application router with all layers applied.
pub fn router(state: AppState) -> Router {
    let cfg = state.config.clone();
    let body_limit = cfg.server.max_body_bytes;

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .merge(hierarchy::hierarchy_routes::<OrganizationPayload>("/organizations"))
        .merge(hierarchy::hierarchy_routes::<MenuPayload>("/menus"))
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/{id}",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg, security_headers_middleware))
}
