//! Remote resource models and the gateway seam.
//!
//! Each submodule defines the wire types for one resource family plus the
//! corresponding [`ApiClient`](crate::client::ApiClient) calls. The
//! [`AssistantsApi`] trait is the contract the orchestration layer
//! ([`Chat`](crate::Chat), [`AssistantService`](crate::AssistantService))
//! depends on, so tests can inject a scripted implementation.

pub mod assistants;
pub mod files;
pub mod messages;
pub mod runs;
pub mod threads;
pub mod vector_stores;

#[cfg(test)]
pub(crate) mod mock;

use crate::client::ApiClient;
use crate::Result;

use assistants::{
    Assistant, CreateAssistantRequest, FileSearchResources, Tool, ToolResources,
};
use files::{File, FilePurpose};
use messages::{CreateMessageRequest, Message, Role};
use runs::{
    CreateRunRequest, ForcedTool, ForcedToolKind, Run, SubmitToolOutputsRequest, ToolChoice,
    ToolChoiceStrategy, ToolOutput,
};
use threads::Thread;
use vector_stores::{CreateVectorStoreRequest, VectorStore, VectorStoreFile};

/// Remote operations the orchestration layer performs, one call each.
///
/// List operations return complete collections; create operations return the
/// created object; run retrieval carries the status plus, for
/// `requires_action`, the pending tool calls.
#[allow(async_fn_in_trait)]
pub trait AssistantsApi {
    async fn create_thread(&self) -> Result<Thread>;
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>>;
    async fn create_message(&self, thread_id: &str, content: &str, role: Role) -> Result<Message>;
    async fn create_run(
        &self,
        assistant_id: &str,
        thread_id: &str,
        force_tool_call: bool,
    ) -> Result<Run>;
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        tool_call_id: &str,
        output: &str,
    ) -> Result<Run>;
    async fn list_assistants(&self) -> Result<Vec<Assistant>>;
    async fn create_assistant(
        &self,
        name: &str,
        description: &str,
        instructions: &str,
        vector_store_ids: Vec<String>,
        tools: Vec<Tool>,
    ) -> Result<Assistant>;
    async fn delete_assistant(&self, assistant_id: &str) -> Result<()>;
    async fn list_files(&self) -> Result<Vec<File>>;
    async fn get_file(&self, file_id: &str) -> Result<File>;
    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> Result<File>;
    async fn delete_file(&self, file_id: &str) -> Result<()>;
    async fn list_vector_stores(&self) -> Result<Vec<VectorStore>>;
    async fn get_vector_store(&self, vector_store_id: &str) -> Result<VectorStore>;
    async fn create_vector_store(&self, name: &str, file_ids: Vec<String>) -> Result<VectorStore>;
    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<()>;
    async fn attach_file_to_vector_store(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFile>;
    async fn delete_vector_store_file(&self, vector_store_id: &str, file_id: &str) -> Result<()>;
    async fn list_vector_store_files(&self, vector_store_id: &str)
        -> Result<Vec<VectorStoreFile>>;
}

impl AssistantsApi for ApiClient {
    async fn create_thread(&self) -> Result<Thread> {
        ApiClient::create_thread(self).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>> {
        ApiClient::list_messages(self, thread_id).await
    }

    async fn create_message(&self, thread_id: &str, content: &str, role: Role) -> Result<Message> {
        ApiClient::create_message(
            self,
            thread_id,
            CreateMessageRequest {
                role,
                content: content.to_string(),
            },
        )
        .await
    }

    async fn create_run(
        &self,
        assistant_id: &str,
        thread_id: &str,
        force_tool_call: bool,
    ) -> Result<Run> {
        let tool_choice = if force_tool_call {
            ToolChoice::Forced(ForcedTool {
                kind: ForcedToolKind::FileSearch,
            })
        } else {
            ToolChoice::Strategy(ToolChoiceStrategy::Auto)
        };
        let request = CreateRunRequest {
            assistant_id: assistant_id.to_string(),
            tool_choice: Some(tool_choice),
        };

        ApiClient::create_run(self, thread_id, request).await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        ApiClient::get_run(self, thread_id, run_id).await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        tool_call_id: &str,
        output: &str,
    ) -> Result<Run> {
        let request = SubmitToolOutputsRequest {
            tool_outputs: vec![ToolOutput {
                tool_call_id: tool_call_id.to_string(),
                output: output.to_string(),
            }],
        };
        ApiClient::submit_tool_outputs(self, thread_id, run_id, request).await
    }

    async fn list_assistants(&self) -> Result<Vec<Assistant>> {
        ApiClient::list_assistants(self).await
    }

    async fn create_assistant(
        &self,
        name: &str,
        description: &str,
        instructions: &str,
        vector_store_ids: Vec<String>,
        tools: Vec<Tool>,
    ) -> Result<Assistant> {
        let request = CreateAssistantRequest {
            model: self.model().to_string(),
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            instructions: Some(instructions.to_string()),
            tools,
            tool_resources: Some(ToolResources {
                code_interpreter: None,
                file_search: Some(FileSearchResources { vector_store_ids }),
            }),
        };

        ApiClient::create_assistant(self, request).await
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<()> {
        ApiClient::delete_assistant(self, assistant_id).await?;
        Ok(())
    }

    async fn list_files(&self) -> Result<Vec<File>> {
        ApiClient::list_files(self).await
    }

    async fn get_file(&self, file_id: &str) -> Result<File> {
        ApiClient::get_file(self, file_id).await
    }

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> Result<File> {
        ApiClient::upload_file(self, filename, bytes, FilePurpose::Assistants).await
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        ApiClient::delete_file(self, file_id).await?;
        Ok(())
    }

    async fn list_vector_stores(&self) -> Result<Vec<VectorStore>> {
        ApiClient::list_vector_stores(self).await
    }

    async fn get_vector_store(&self, vector_store_id: &str) -> Result<VectorStore> {
        ApiClient::get_vector_store(self, vector_store_id).await
    }

    async fn create_vector_store(&self, name: &str, file_ids: Vec<String>) -> Result<VectorStore> {
        ApiClient::create_vector_store(
            self,
            CreateVectorStoreRequest {
                name: name.to_string(),
                file_ids,
            },
        )
        .await
    }

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<()> {
        ApiClient::delete_vector_store(self, vector_store_id).await?;
        Ok(())
    }

    async fn attach_file_to_vector_store(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFile> {
        ApiClient::attach_file_to_vector_store(self, vector_store_id, file_id).await
    }

    async fn delete_vector_store_file(&self, vector_store_id: &str, file_id: &str) -> Result<()> {
        ApiClient::delete_vector_store_file(self, vector_store_id, file_id).await?;
        Ok(())
    }

    async fn list_vector_store_files(
        &self,
        vector_store_id: &str,
    ) -> Result<Vec<VectorStoreFile>> {
        ApiClient::list_vector_store_files(self, vector_store_id).await
    }
}
