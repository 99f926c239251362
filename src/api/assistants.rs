use std::collections::HashMap;

use derive_builder::Builder;
use schemars::schema::RootSchema;
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, Empty};
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Assistant {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    /// The name of the assistant. The maximum length is 256 characters.
    pub name: Option<String>,
    pub model: String,
    /// The system instructions that the assistant uses.
    pub instructions: Option<String>,
    pub tools: Vec<Tool>,
    /// Resources used by the assistant's tools, e.g. the vector store ids
    /// backing `file_search`.
    pub tool_resources: Option<ToolResources>,
    pub metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    FileSearch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_search: Option<FileSearchOptions>,
    },
    CodeInterpreter {},
    Function { function: FunctionDefinition },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FileSearchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_num_results: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema for the function's arguments.
    pub parameters: RootSchema,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ToolResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_interpreter: Option<CodeInterpreterResources>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_search: Option<FileSearchResources>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CodeInterpreterResources {
    pub file_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FileSearchResources {
    pub vector_store_ids: Vec<String>,
}

#[derive(Serialize, Builder, Debug, Clone, Default)]
#[builder(pattern = "owned")]
#[builder(name = "CreateAssistantBuilder")]
#[builder(setter(strip_option, into))]
pub struct CreateAssistantRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub instructions: Option<String>,
    #[builder(default)]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub tool_resources: Option<ToolResources>,
}

impl ApiClient {
    pub async fn create_assistant(&self, request: CreateAssistantRequest) -> Result<Assistant> {
        self.post("assistants", request).await
    }

    pub async fn list_assistants(&self) -> Result<Vec<Assistant>> {
        self.list("assistants").await
    }

    pub async fn delete_assistant(&self, assistant_id: &str) -> Result<Empty> {
        self.delete(format!("assistants/{assistant_id}")).await
    }
}
