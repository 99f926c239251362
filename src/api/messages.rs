use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    pub thread_id: String,
    /// The entity that produced the message.
    pub role: Role,
    /// Ordered content blocks; the first block of an assistant reply is
    /// expected to be text.
    pub content: Vec<Content>,
    pub assistant_id: Option<String>,
    /// The run that produced this message, if any.
    pub run_id: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text { text: Text },
    ImageFile { image_file: ImageFile },
    ImageUrl { image_url: ImageUrl },
    Refusal { refusal: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Text {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Citation marker embedded in assistant text, e.g. `【4:0†source】`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: String,
    /// The literal marker text as it appears in the message body.
    pub text: String,
    pub start_index: u32,
    pub end_index: u32,
    #[serde(default)]
    pub file_citation: Option<FileCitation>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FileCitation {
    pub file_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageFile {
    pub file_id: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateMessageRequest {
    pub role: Role,
    pub content: String,
}

impl ApiClient {
    pub async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>> {
        self.list(format!("threads/{thread_id}/messages")).await
    }

    pub async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> Result<Message> {
        self.post(format!("threads/{thread_id}/messages"), request)
            .await
    }
}
