use financial_assistant::{
    config::Config, gemini::GeminiClient, terminal::run_chat, AdvisorGateway, Catalog,
};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env first so RUST_LOG from it reaches the filter
    dotenv::dotenv().ok();

    // Logs go to stderr so they don't interleave with the conversation
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let catalog = Arc::new(Catalog::load(&config.catalog_path)?);
    let client = Arc::new(GeminiClient::new(config.gemini())?);
    let advisor = AdvisorGateway::new(client, catalog);

    println!("Personal Finance Assistant");
    println!("Ask questions about investing in India and get personalized recommendations.");
    println!("Not financial advice.\n");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    run_chat(&advisor, config.ask_timeout, stdin, &mut stdout).await?;

    Ok(())
}
