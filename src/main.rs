//! Conversational coaching service entry point.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use convo_coach::adapters::ai::{OllamaConfig, OllamaProvider};
use convo_coach::adapters::http::{app_router, CoachAppState};
use convo_coach::config::AppConfig;
use convo_coach::ports::TextGenerator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server.log_level, config.is_production())?;
    config.validate()?;

    let provider = OllamaProvider::new(OllamaConfig::from(&config.model))?;
    let generator: Arc<dyn TextGenerator> = Arc::new(provider);
    let state = CoachAppState::new(generator, config.model.timeout());
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        model = %config.model.name,
        model_url = %config.model.url,
        static_dir = %config.server.static_dir.display(),
        "Coaching service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Coaching service stopped");
    Ok(())
}

/// JSON lines in production, human-readable output elsewhere.
/// `RUST_LOG` overrides the configured filter.
fn init_tracing(log_level: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = Registry::default().with(filter);

    if json {
        registry.with(fmt::layer().json().with_target(true)).try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
