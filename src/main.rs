// Main entry point - Dependency injection and server setup
use std::sync::Arc;

use sensor_charts::application::chart_service::ChartService;
use sensor_charts::infrastructure::api_client::ApiSensorRepository;
use sensor_charts::infrastructure::config::load_settings;
use sensor_charts::infrastructure::token_store::InMemoryTokenStore;
use sensor_charts::presentation::app_state::AppState;
use sensor_charts::presentation::router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let settings = load_settings()?;

    // Create repository (infrastructure layer)
    let tokens = Arc::new(InMemoryTokenStore::new(settings.api.access_token.clone()));
    let repository = Arc::new(ApiSensorRepository::new(&settings.api, tokens)?);

    // Create services (application layer)
    let chart_service = ChartService::new(repository);
    let state = Arc::new(AppState { chart_service });

    // Start server
    let addr = settings.server.listen_addr;
    tracing::info!("Starting sensor-charts service on {} (upstream {})", addr, settings.api.base_url);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}
