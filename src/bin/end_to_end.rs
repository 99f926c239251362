//! Full chat round-trip: stage data, build the assistant, ask one question,
//! print the reply with its citations, then tear everything down.

use std::path::Path;

use assistant_manager::exporters::directory::DirectoryExporter;
use assistant_manager::exporters::files::FilesExporter;
use assistant_manager::{
    prompts, ApiClient, AssistantService, Chat, ChatOutcome, Config, Credentials, Result,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    if let Err(error) = run().await {
        log::error!("Error: {error}");
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env();
    DirectoryExporter::new("directory", &config).export()?;
    FilesExporter::new("about.txt", &config).export()?;

    let client = ApiClient::new(Credentials::from_env(), config.model.clone())?;
    let prompt = prompts::load_prompt(Path::new(&config.data_dir).join("prompt.md")).await?;
    let service = AssistantService::new(&client, prompt, &config);

    log::info!("Building {}", service.assistant_name());
    service.delete_assistant().await?;

    let assistant_id = service.assistant_id().await?;
    log::info!("Assistant ID: {assistant_id}");

    let mut chat = Chat::new(&client, &assistant_id);
    chat.start().await?;

    let message = "What do you know about?";
    println!("\nMessage:\n{message}");

    match chat.send_user_message(message).await? {
        ChatOutcome::Reply(response) => {
            println!("\n{}:\n{}", service.assistant_name(), response.message);
            println!("\nTokens: {}", response.token_count);
            if !response.annotation_files.is_empty() {
                println!("Sources: {}", response.annotation_files.join(", "));
            }
        }
        ChatOutcome::ActionRequired(pending) => {
            log::warn!("Unexpected tool call: {}", pending.name);
        }
    }

    service.delete_assistant().await?;
    Ok(())
}
