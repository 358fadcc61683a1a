//! Map tile server library.
//!
//! Serves PNG tiles of a scalar field sampled on cells, addressed by zoom
//! level and tile coordinates, plus the page and catalog the map UI needs.

pub mod catalog;
pub mod config;
pub mod gate;
pub mod handlers;
pub mod metrics;
pub mod rendering;
pub mod state;

use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the HTTP router with every route mounted under the configured prefix.
pub fn build_router(state: Arc<AppState>) -> Router {
    let prefix = state.config.route_prefix.clone();
    let route = |path: &str| format!("{}{}", prefix, path);

    let mut app = Router::new()
        .route(&route("/map/:field/:z/:x/:tile"), get(handlers::tile_handler))
        .route(&route("/"), get(handlers::index_handler))
        .route(&route("/index.html"), get(handlers::index_handler))
        .route(&route("/list"), get(handlers::list_handler))
        .route(&route("/:field"), get(handlers::field_handler));
    if !prefix.is_empty() {
        app = app.route(&prefix, get(handlers::index_handler));
    }

    app.route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .fallback(handlers::static_handler)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
