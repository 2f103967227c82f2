//! Server entry point: loads configuration, wires the production
//! collaborators into an `Orchestrator`, starts the job registry's sweep
//! task, and serves the job API.

use std::sync::Arc;

use podforge_audio::FfmpegAudioTool;
use podforge_config::{load_settings, Settings};
use podforge_content_fetcher::LocalOrHttpFetcher;
use podforge_orchestrator::{JobRegistry, Orchestrator};
use podforge_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let env = std::env::var("PODFORGE_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            Settings::default()
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %settings.server.host,
        port = settings.server.port,
        "starting podforge server"
    );

    let metrics_handle = init_metrics();

    let registry = Arc::new(JobRegistry::new());
    let _sweep_shutdown = registry.start_sweep_task();

    let orchestrator = Arc::new(Orchestrator::new(
        &settings,
        registry,
        LocalOrHttpFetcher::new(),
        FfmpegAudioTool::default(),
    )?);

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let state = AppState::new(orchestrator, Arc::new(settings), metrics_handle);
    let router = create_router(state);

    let addr = format!("{host}:{port}");
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
