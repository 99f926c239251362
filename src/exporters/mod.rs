//! Exporters stage local data into the upload directory (`bin_dir`) that
//! [`AssistantService`](crate::AssistantService) reads retrieval files from.

pub mod directory;
pub mod files;

use std::path::Path;

use crate::Result;

pub(crate) fn create_dir(dir_path: &Path) -> Result<()> {
    log::info!("Creating data dir path: {}", dir_path.display());
    std::fs::create_dir_all(dir_path)?;
    Ok(())
}
