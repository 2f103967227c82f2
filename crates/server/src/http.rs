//! The job API (spec §6): `submit`/`status`/`artifacts`/`cancel`/`list`/
//! `validate`, plus the ambient health/readiness/metrics endpoints the
//! teacher's server crate carries regardless of core-scope boundaries.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use podforge_core::{Brief, JobId};

use crate::error::ServerError;
use crate::metrics::metrics_handler;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.settings.server.cors_origins, state.settings.server.cors_enabled);

    Router::new()
        .route("/jobs", post(submit_job))
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", get(get_job))
        .route("/jobs/:id/artifacts", get(get_artifacts))
        .route("/jobs/:id", delete(cancel_job))
        .route("/validate", post(validate_brief))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        .with_state(state)
}

/// Builds CORS from configuration rather than a blanket `Any`: permissive
/// only when explicitly disabled, defaulting to `localhost:3000` when no
/// origin is configured (spec §6 ambient stack).
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled, allowing all origins");
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        tracing::info!("no CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin, "invalid CORS origin, skipping");
                None
            })
        })
        .collect();

    if parsed.is_empty() {
        tracing::error!("all configured CORS origins were invalid, falling back to localhost");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(true)
}

fn parse_job_id(raw: &str) -> Result<JobId, ServerError> {
    Uuid::parse_str(raw)
        .map(JobId)
        .map_err(|_| ServerError::InvalidRequest(format!("'{raw}' is not a valid job id")))
}

#[derive(Debug, Deserialize)]
struct SubmitRequest {
    #[serde(flatten)]
    brief: Brief,
    request_id: Option<String>,
}

/// `POST /jobs` (spec §6 `submit`): validates and enqueues, returns `202
/// Accepted` with the queued job so the caller can poll `status` without
/// blocking on the minutes-long pipeline.
async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<podforge_core::Job>), StatusCode> {
    let job = state
        .orchestrator
        .accept(request.brief, request.request_id)
        .map_err(|e| StatusCode::from(ServerError::Core(e)))?;
    state.orchestrator.spawn(job.id);
    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// `GET /jobs/{id}` (spec §6 `status`).
async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<podforge_core::Job>, StatusCode> {
    let id = parse_job_id(&id).map_err(StatusCode::from)?;
    state
        .orchestrator
        .get(id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// `GET /jobs/{id}/artifacts` (spec §6 `artifacts`): the same stage
/// handoff documents persisted to `{jobId}-artifacts.json` on success, read
/// back from the in-memory job record so it is available mid-run too.
async fn get_artifacts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<podforge_core::JobArtifacts>, StatusCode> {
    let id = parse_job_id(&id).map_err(StatusCode::from)?;
    state
        .orchestrator
        .get(id)
        .map(|job| Json(job.artifacts))
        .ok_or(StatusCode::NOT_FOUND)
}

/// `DELETE /jobs/{id}` (spec §6 `cancel`).
async fn cancel_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<podforge_core::JobState>, StatusCode> {
    let id = parse_job_id(&id).map_err(StatusCode::from)?;
    state
        .orchestrator
        .cancel(id)
        .map(Json)
        .map_err(|e| StatusCode::from(ServerError::Core(e)))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

/// `GET /jobs?limit=&offset=` (spec §6 `list`).
async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<podforge_core::Job>> {
    let limit = query.limit.unwrap_or(50);
    let offset = query.offset.unwrap_or(0);
    Json(state.orchestrator.list(limit, offset))
}

/// `POST /validate` (spec §6 `validate`): advisory, never creates a job.
async fn validate_brief(
    State(state): State<AppState>,
    Json(brief): Json<Brief>,
) -> Json<podforge_orchestrator::ValidationReport> {
    Json(state.orchestrator.validate(&brief))
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthBody {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
struct ReadinessBody {
    status: &'static str,
    jobs_in_flight: usize,
}

async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let in_flight = state
        .orchestrator
        .list(usize::MAX, 0)
        .into_iter()
        .filter(|job| job.state == podforge_core::JobState::Processing)
        .count();
    Json(ReadinessBody {
        status: "ready",
        jobs_in_flight: in_flight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use podforge_audio::FfmpegAudioTool;
    use podforge_config::Settings;
    use podforge_content_fetcher::LocalOrHttpFetcher;
    use podforge_orchestrator::JobRegistry;
    use std::sync::Arc;

    fn test_state() -> AppState {
        let mut settings = Settings::default();
        settings.server.output_dir = "/tmp/podforge-server-test-output".to_string();
        settings.server.temp_dir = "/tmp/podforge-server-test-temp".to_string();
        let registry = Arc::new(JobRegistry::new());
        let orchestrator = Arc::new(
            podforge_orchestrator::Orchestrator::new(
                &settings,
                registry,
                LocalOrHttpFetcher::new(),
                FfmpegAudioTool::default(),
            )
            .unwrap(),
        );
        AppState::new(orchestrator, Arc::new(settings), crate::metrics::init_metrics())
    }

    #[test]
    fn router_builds_from_state() {
        let _ = create_router(test_state());
    }

    #[test]
    fn unconfigured_cors_defaults_to_localhost() {
        let layer = build_cors_layer(&[], true);
        let _ = layer;
    }

    #[test]
    fn disabled_cors_is_permissive() {
        let layer = build_cors_layer(&["https://example.com".to_string()], false);
        let _ = layer;
    }
}
