//! Headless build: tears down any existing assistant, rebuilds it from the
//! staged files, and tears it down again.

use assistant_manager::{ApiClient, AssistantService, Config, Credentials, Result};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    if let Err(error) = run().await {
        log::error!("Error: {error}");
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env();
    let client = ApiClient::new(Credentials::from_env(), config.model.clone())?;
    let service = AssistantService::new(&client, "You are a helpful assistant", &config);

    log::info!("Building {}", service.assistant_name());
    service.delete_assistant().await?;

    let assistant_id = service.assistant_id().await?;
    log::info!("Assistant ID: {assistant_id}");

    service.delete_assistant().await?;
    Ok(())
}
