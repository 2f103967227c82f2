//! Prometheus metrics endpoint (spec §6 ambient stack), built the way the
//! teacher wires `metrics` + `metrics-exporter-prometheus`: install a global
//! recorder once at startup, then render its buffer on every `/metrics` GET.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Installs the process-wide Prometheus recorder and returns the handle
/// `metrics_handler` renders from. Call once, at startup.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

pub async fn metrics_handler(
    axum::extract::State(state): axum::extract::State<crate::state::AppState>,
) -> impl IntoResponse {
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics_handle.render(),
    )
}
