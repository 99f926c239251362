//! Tool-call round-trip: the assistant is expected to pause on the weather
//! function, which is answered locally and submitted back to the run.

use std::path::Path;

use assistant_manager::{
    prompts, tools, ApiClient, AssistantService, Chat, ChatOutcome, Config, Credentials, Result,
};
use serde_json::Value;

const ASSISTANT_NAME: &str = "AI-Assistant-Manager-Tool-Test";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    if let Err(error) = run().await {
        log::error!("Error: {error}");
    }
}

async fn run() -> Result<()> {
    let mut config = Config::from_env();
    config.assistant_name = ASSISTANT_NAME.to_string();

    let client = ApiClient::new(Credentials::from_env(), config.model.clone())?;

    let mut assistant_tools =
        tools::load_tools(Path::new(&config.data_dir).join("tools.json")).await?;
    assistant_tools.extend(tools::retrieval_tools());

    let prompt = prompts::load_prompt(Path::new(&config.data_dir).join("prompt.md")).await?;
    let service =
        AssistantService::new(&client, prompt, &config).with_tools(assistant_tools);

    log::info!("Building {}", service.assistant_name());
    service.delete_assistant().await?;

    let assistant_id = service.assistant_id().await?;
    log::info!("Assistant ID: {assistant_id}");

    let mut chat = Chat::new(&client, &assistant_id);
    chat.start().await?;

    let message = "What is the weather like today?";
    println!("\nMessage:\n{message}");

    match chat.send_user_message(message).await? {
        ChatOutcome::ActionRequired(pending) => {
            println!("\nTOOL_CALL: {} {}", pending.name, pending.arguments);

            let location = pending
                .arguments
                .get("location")
                .and_then(Value::as_str)
                .unwrap_or("Medina, Ohio");
            let weather = get_weather(location);
            println!("{weather}");

            match chat
                .submit_tool_outputs(&pending.run_id, &pending.tool_call_id, &weather)
                .await?
            {
                ChatOutcome::Reply(response) => {
                    println!("\n{}:\n{}", service.assistant_name(), response.message);
                    println!("\nTokens: {}", response.token_count);
                }
                ChatOutcome::ActionRequired(next) => {
                    log::warn!("Run paused on a second tool call: {}", next.name);
                }
            }
        }
        ChatOutcome::Reply(response) => {
            println!("\n(no tool call)\n{}", response.message);
        }
    }

    service.delete_assistant().await?;
    Ok(())
}

fn get_weather(location: &str) -> String {
    let weather = match location {
        "Medina, Ohio" => "sunny with a temperature of 75°F.",
        "New York" => "cloudy with a temperature of 65°F.",
        "London" => "rainy with a temperature of 60°F.",
        _ => "weather data not available for this location.",
    };
    format!("The current weather in {location} is {weather}")
}
