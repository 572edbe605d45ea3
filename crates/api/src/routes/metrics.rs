//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use metrics::{Unit, describe_counter};
use metrics_exporter_prometheus::PrometheusHandle;

/// Registers help text for the counters the stock manager emits.
pub fn describe() {
    describe_counter!("items_created_total", "Items created");
    describe_counter!("items_deleted_total", "Items deleted");
    describe_counter!(
        "items_restocked_units_total",
        Unit::Count,
        "Units added to stock by restocks"
    );
    describe_counter!(
        "items_dispatched_units_total",
        Unit::Count,
        "Units removed from stock by dispatches"
    );
    describe_counter!(
        "items_dispatch_rejected_total",
        "Dispatches refused for insufficient stock"
    );
    describe_counter!(
        "item_write_conflicts_total",
        "Optimistic item writes that lost a version race"
    );
}

/// GET /metrics — returns Prometheus-formatted metrics.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
}
