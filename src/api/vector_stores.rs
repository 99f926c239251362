use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{ApiClient, Empty};
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VectorStore {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    pub name: Option<String>,
    pub status: VectorStoreStatus,
    pub file_counts: FileCounts,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreStatus {
    Expired,
    InProgress,
    Completed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FileCounts {
    pub in_progress: u32,
    pub completed: u32,
    pub failed: u32,
    pub cancelled: u32,
    pub total: u32,
}

/// Membership record of a file inside a vector store. Its id is the file id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VectorStoreFile {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    pub vector_store_id: String,
    pub status: VectorStoreFileStatus,
    pub last_error: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreFileStatus {
    InProgress,
    Completed,
    Cancelled,
    Failed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CreateVectorStoreRequest {
    pub name: String,
    pub file_ids: Vec<String>,
}

impl ApiClient {
    pub async fn list_vector_stores(&self) -> Result<Vec<VectorStore>> {
        self.list("vector_stores").await
    }

    pub async fn get_vector_store(&self, vector_store_id: &str) -> Result<VectorStore> {
        self.get(format!("vector_stores/{vector_store_id}")).await
    }

    pub async fn create_vector_store(
        &self,
        request: CreateVectorStoreRequest,
    ) -> Result<VectorStore> {
        self.post("vector_stores", request).await
    }

    pub async fn delete_vector_store(&self, vector_store_id: &str) -> Result<Empty> {
        self.delete(format!("vector_stores/{vector_store_id}")).await
    }

    pub async fn attach_file_to_vector_store(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFile> {
        self.post(
            format!("vector_stores/{vector_store_id}/files"),
            json!({ "file_id": file_id }),
        )
        .await
    }

    pub async fn delete_vector_store_file(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<Empty> {
        self.delete(format!("vector_stores/{vector_store_id}/files/{file_id}"))
            .await
    }

    pub async fn list_vector_store_files(
        &self,
        vector_store_id: &str,
    ) -> Result<Vec<VectorStoreFile>> {
        self.list(format!("vector_stores/{vector_store_id}/files"))
            .await
    }
}
