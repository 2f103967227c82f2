//! Shared application state, mirroring the teacher's `AppState`: the
//! long-lived collaborators every handler needs, cloned cheaply per request
//! behind `Arc`.

use std::sync::Arc;

use podforge_audio::FfmpegAudioTool;
use podforge_config::Settings;
use podforge_content_fetcher::LocalOrHttpFetcher;
use podforge_orchestrator::Orchestrator;

use metrics_exporter_prometheus::PrometheusHandle;

/// The production orchestrator, fixed to the two real collaborators: a
/// local-file/HTTP content fetcher and an `ffmpeg`-backed audio tool.
pub type ProdOrchestrator = Orchestrator<LocalOrHttpFetcher, FfmpegAudioTool>;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ProdOrchestrator>,
    pub settings: Arc<Settings>,
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<ProdOrchestrator>,
        settings: Arc<Settings>,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        Self {
            orchestrator,
            settings,
            metrics_handle,
        }
    }
}
