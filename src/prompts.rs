//! Prompt file loading.

use std::path::Path;

use chrono::Local;

use crate::Result;

/// Placeholder replaced with today's ISO date when a prompt is loaded.
pub const CURRENT_DATE_VARIABLE: &str = "{{CURRENT_DATE}}";

/// Reads a prompt file, substituting every occurrence of
/// [`CURRENT_DATE_VARIABLE`].
pub async fn load_prompt(path: impl AsRef<Path>) -> Result<String> {
    let prompt = tokio::fs::read_to_string(path).await?;
    let today = Local::now().date_naive().to_string();
    Ok(prompt.replace(CURRENT_DATE_VARIABLE, &today))
}
