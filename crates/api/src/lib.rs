//! HTTP API server with observability for the item storage service.
//!
//! Provides REST endpoints for item management and stock movements,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod paging;
pub mod routes;
pub mod validation;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::StockManager;
use item_store::ItemStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::items::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: ItemStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/items",
            get(routes::items::list::<S>).post(routes::items::create::<S>),
        )
        .route(
            "/items/{id}",
            get(routes::items::get::<S>)
                .patch(routes::items::update::<S>)
                .delete(routes::items::delete::<S>),
        )
        .route("/items/{id}/restock", post(routes::items::restock::<S>))
        .route("/items/{id}/dispatch", post(routes::items::dispatch::<S>))
        .route(
            "/items/{id}/discontinue",
            post(routes::items::discontinue::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around `store` using the write budget and
/// base path from `config`.
pub fn create_state<S: ItemStore>(store: S, config: &Config) -> Arc<AppState<S>> {
    Arc::new(AppState {
        manager: StockManager::new(store).with_write_attempts(config.item_write_attempts),
        base_path: config.base_path.clone(),
    })
}
