use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, Empty};
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct File {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    pub bytes: u64,
    pub filename: String,
    pub purpose: FilePurpose,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FilePurpose {
    Assistants,
    AssistantsOutput,
    Batch,
    BatchOutput,
    #[serde(rename = "fine-tune")]
    #[strum(serialize = "fine-tune")]
    FineTune,
    #[serde(rename = "fine-tune-results")]
    #[strum(serialize = "fine-tune-results")]
    FineTuneResults,
    Vision,
    UserData,
}

impl ApiClient {
    pub async fn upload_file(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        purpose: FilePurpose,
    ) -> Result<File> {
        let file_part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")?;

        let form = Form::new()
            .part("file", file_part)
            .text("purpose", purpose.to_string());

        self.post_multipart("files", form).await
    }

    pub async fn list_files(&self) -> Result<Vec<File>> {
        self.list("files").await
    }

    pub async fn get_file(&self, file_id: &str) -> Result<File> {
        self.get(format!("files/{file_id}")).await
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<Empty> {
        self.delete(format!("files/{file_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purpose_serializes_with_hyphens_where_the_api_uses_them() {
        assert_eq!(FilePurpose::Assistants.to_string(), "assistants");
        assert_eq!(FilePurpose::FineTune.to_string(), "fine-tune");
        assert_eq!(
            serde_json::to_value(FilePurpose::FineTune).unwrap(),
            serde_json::json!("fine-tune")
        );
    }
}
