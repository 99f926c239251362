//! An orchestration layer over the OpenAI Assistants API.
//!
//! The crate manages the lifecycle of an assistant and its knowledge base
//! (retrieval files grouped into vector stores), and drives conversational
//! runs to completion, surfacing tool calls for the caller to fulfil.
//!
//! - [`ApiClient`] is the thin HTTP gateway, one request per remote
//!   operation.
//! - [`AssistantService`] finds or builds the assistant together with its
//!   vector stores and retrieval files, and tears everything down again.
//! - [`Chat`] owns a conversation thread and polls runs until they complete,
//!   time out, or pause on a tool call.

use serde::Deserialize;

pub mod api;
pub mod chat;
pub mod client;
pub mod config;
pub mod exporters;
pub mod prompts;
pub mod service;
pub mod tools;

pub use api::AssistantsApi;
pub use chat::{Chat, ChatOutcome, ChatResponse, PendingToolCall, PollSettings};
pub use client::ApiClient;
pub use config::Config;
pub use service::AssistantService;

const BASE_URL: &str = "https://api.openai.com/v1/";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid authorization header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("chat has not been started; call start() first")]
    ChatNotStarted,
    #[error("run failed with status: {status}")]
    RunFailed { status: api::runs::RunStatus },
    #[error("run timed out after {seconds} seconds")]
    RunTimedOut { seconds: u64 },
    #[error("no text content found in the messages")]
    MissingTextContent,
    #[error("vector store {vector_store_id} still has failed files after {attempts} validation attempts")]
    VectorStoreValidation {
        vector_store_id: String,
        attempts: u32,
    },
    #[error("vector store {vector_store_id} expired before becoming ready")]
    VectorStoreExpired { vector_store_id: String },
    #[error("unrecognized date: {0}")]
    InvalidDate(String),
}

/// Error payload returned by the remote API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub param: Option<String>,
    pub code: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// API key and base URL used by [`ApiClient`].
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub base_url: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Reads `OPENAI_API_KEY` (and optionally `OPENAI_BASE_URL`) from the
    /// environment, loading a `.env` file first if one exists. A missing key
    /// yields empty credentials, which the API will reject on first use.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let base_url = std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| BASE_URL.to_string());
        Self { api_key, base_url }
    }
}
