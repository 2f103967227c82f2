//! Thin HTTP transport over the Orchestrator's job API (spec §6): axum
//! routes that translate `submit`/`status`/`artifacts`/`cancel`/`list`/
//! `validate` into `podforge_orchestrator::Orchestrator` calls, plus the
//! ambient stack the teacher's server crate carries regardless of the
//! spec's "HTTP transport is out of core scope" framing: request tracing,
//! CORS, compression, health/readiness probes, and Prometheus metrics.

pub mod error;
pub mod http;
pub mod metrics;
pub mod state;

pub use error::ServerError;
pub use http::create_router;
pub use metrics::init_metrics;
pub use state::AppState;
