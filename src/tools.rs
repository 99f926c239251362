//! Tool definition loading.

use std::path::Path;

use crate::api::assistants::Tool;
use crate::Result;

/// The default tool set: retrieval only.
pub fn retrieval_tools() -> Vec<Tool> {
    vec![Tool::FileSearch { file_search: None }]
}

/// Loads function tool definitions from a JSON file.
pub async fn load_tools(path: impl AsRef<Path>) -> Result<Vec<Tool>> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}
