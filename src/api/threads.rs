use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::assistants::ToolResources;
use crate::client::ApiClient;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Thread {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    pub tool_resources: Option<ToolResources>,
    pub metadata: Option<HashMap<String, String>>,
}

impl ApiClient {
    pub async fn create_thread(&self) -> Result<Thread> {
        self.post("threads", json!({})).await
    }
}
