use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;

use voxgate::application::services::TranscriptionWorker;
use voxgate::infrastructure::audio::TranscriptionEngineFactory;
use voxgate::infrastructure::observability::{TracingConfig, init_tracing};
use voxgate::presentation::{AppState, AuthGate, Settings, create_router};

const DEFAULT_CONFIG_PATH: &str = "config/config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path =
        std::env::var("VOXGATE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    // Configuration failure is the one fatal error: nothing is served
    // without a shared secret and a model identifier.
    let settings = Settings::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path))?;

    init_tracing(
        TracingConfig::new(settings.logging.level.clone(), settings.logging.enable_json),
        settings.server.port,
    );

    let engine = TranscriptionEngineFactory::create(&settings.transcription)
        .context("constructing transcription engine")?;
    tracing::info!(
        provider = ?settings.transcription.provider,
        model = %settings.transcription.model,
        "Transcription engine ready"
    );

    let (worker, dispatcher) = TranscriptionWorker::new(engine);
    tokio::spawn(worker.run());

    let state = AppState {
        dispatcher,
        auth: AuthGate::new(settings.auth.api_key.clone()),
    };

    let router = create_router(state);

    let host: std::net::IpAddr = settings
        .server
        .host
        .parse()
        .with_context(|| format!("invalid listen host {}", settings.server.host))?;
    let addr = SocketAddr::from((host, settings.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
