use financial_assistant::{
    api::{start_server, ApiState},
    config::Config,
    gemini::GeminiClient,
    AdvisorGateway, Catalog,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables (.env may carry RUST_LOG)
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    info!("Financial Assistant - API Server");
    info!("Port: {}", config.port);
    info!("Model: {}", config.model);

    // Missing or malformed catalog is fatal
    let catalog = Arc::new(Catalog::load(&config.catalog_path)?);
    let client = Arc::new(GeminiClient::new(config.gemini())?);
    let advisor = AdvisorGateway::new(client, catalog);

    let state = ApiState::new(advisor, config.model.clone(), config.ask_timeout)
        .with_max_sessions(config.max_sessions);

    info!("Starting API server...");

    start_server(state, config.static_dir.as_deref(), config.port).await?;

    Ok(())
}
