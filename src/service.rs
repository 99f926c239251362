//! Assistant lifecycle and vector store reconciliation.
//!
//! Identity is prefix-based: vector stores and retrieval files belonging to
//! this deployment are recognized purely by the configured
//! `data_file_prefix`. Invariant: no two deployments share a prefix.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::sleep;
use walkdir::WalkDir;

use crate::api::assistants::Tool;
use crate::api::vector_stores::{VectorStoreFileStatus, VectorStoreStatus};
use crate::api::AssistantsApi;
use crate::config::Config;
use crate::tools::retrieval_tools;
use crate::{Error, Result};

/// Repair rounds attempted before a store with persistently failing files is
/// given up on.
const MAX_VALIDATION_ATTEMPTS: u32 = 5;
const VALIDATION_RETRY_DELAY: Duration = Duration::from_secs(1);
const READY_POLL_INTERVAL: Duration = Duration::from_secs(5);

enum Validation {
    Clean,
    Repaired { count: usize },
}

/// Finds or builds the assistant together with its vector stores and
/// retrieval files, and deletes all three families on teardown.
pub struct AssistantService<'a, C: AssistantsApi> {
    client: &'a C,
    prompt: String,
    assistant_name: String,
    assistant_description: String,
    data_file_prefix: String,
    bin_dir: PathBuf,
    tools: Vec<Tool>,
}

impl<'a, C: AssistantsApi> AssistantService<'a, C> {
    pub fn new(client: &'a C, prompt: impl Into<String>, config: &Config) -> Self {
        Self {
            client,
            prompt: prompt.into(),
            assistant_name: config.assistant_name.clone(),
            assistant_description: config.assistant_description.clone(),
            data_file_prefix: config.data_file_prefix.clone(),
            bin_dir: PathBuf::from(&config.bin_dir),
            tools: retrieval_tools(),
        }
    }

    /// Replaces the default retrieval-only tool set.
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    /// Returns the id of the existing assistant, creating it (and its
    /// knowledge base) when absent.
    pub async fn assistant_id(&self) -> Result<String> {
        match self.find_existing_assistant().await? {
            Some(assistant_id) => Ok(assistant_id),
            None => self.create_assistant().await,
        }
    }

    async fn find_existing_assistant(&self) -> Result<Option<String>> {
        let assistants = self.client.list_assistants().await?;
        Ok(assistants
            .into_iter()
            .find(|assistant| {
                assistant.name.as_deref() == Some(self.assistant_name.as_str())
                    || assistant.id == self.assistant_name
            })
            .map(|assistant| assistant.id))
    }

    async fn create_assistant(&self) -> Result<String> {
        log::info!("Creating new assistant {}", self.assistant_name);
        let vector_store_ids = self.vector_store_ids().await?;
        let assistant = self
            .client
            .create_assistant(
                &self.assistant_name,
                &self.assistant_description,
                &self.prompt,
                vector_store_ids,
                self.tools.clone(),
            )
            .await?;
        Ok(assistant.id)
    }

    /// Ids of the vector stores backing retrieval. Stores already matching
    /// the prefix are trusted as-is; only a freshly created store is
    /// validated for failed file ingestions.
    pub async fn vector_store_ids(&self) -> Result<Vec<String>> {
        let existing = self.find_existing_vector_stores().await?;
        if !existing.is_empty() {
            return Ok(existing);
        }
        Ok(vec![self.create_vector_store().await?])
    }

    async fn find_existing_vector_stores(&self) -> Result<Vec<String>> {
        let stores = self.client.list_vector_stores().await?;
        Ok(stores
            .into_iter()
            .filter(|store| {
                store
                    .name
                    .as_deref()
                    .is_some_and(|name| name.starts_with(&self.data_file_prefix))
            })
            .map(|store| store.id)
            .collect())
    }

    async fn create_vector_store(&self) -> Result<String> {
        log::info!("Creating new vector store");
        let file_ids = self.retrieval_file_ids().await?;
        let name = format!("{} vector store", self.data_file_prefix);
        let store = self.client.create_vector_store(&name, file_ids).await?;

        self.wait_until_ready(&store.id).await?;
        self.validate_vector_store(&store.id).await?;
        Ok(store.id)
    }

    /// Polls the store until ingestion settles. Failed member files are
    /// logged here and repaired by validation.
    async fn wait_until_ready(&self, vector_store_id: &str) -> Result<()> {
        loop {
            let store = self.client.get_vector_store(vector_store_id).await?;
            match store.status {
                VectorStoreStatus::Completed => {
                    if store.file_counts.failed > 0 {
                        log::warn!(
                            "Some files ({}) failed when uploaded to vector store ({vector_store_id})",
                            store.file_counts.failed
                        );
                    }
                    return Ok(());
                }
                VectorStoreStatus::Expired => {
                    return Err(Error::VectorStoreExpired {
                        vector_store_id: vector_store_id.to_string(),
                    });
                }
                VectorStoreStatus::InProgress => {
                    log::info!("Waiting for vector store to be ready");
                    sleep(READY_POLL_INTERVAL).await;
                }
            }
        }
    }

    /// Bounded repair loop: each round deletes failed member files,
    /// re-uploads them from their matching local paths, and re-attaches
    /// them. Errors inside a round are logged and count against the budget.
    async fn validate_vector_store(&self, vector_store_id: &str) -> Result<()> {
        for attempt in 1..=MAX_VALIDATION_ATTEMPTS {
            if attempt > 1 {
                sleep(VALIDATION_RETRY_DELAY).await;
            }
            match self.repair_failed_files(vector_store_id).await {
                Ok(Validation::Clean) => return Ok(()),
                Ok(Validation::Repaired { count }) => {
                    log::info!(
                        "Repaired {count} failed files in vector store {vector_store_id} (attempt {attempt})"
                    );
                }
                Err(error) => {
                    log::error!("Error validating vector store {vector_store_id}: {error}");
                }
            }
        }

        Err(Error::VectorStoreValidation {
            vector_store_id: vector_store_id.to_string(),
            attempts: MAX_VALIDATION_ATTEMPTS,
        })
    }

    async fn repair_failed_files(&self, vector_store_id: &str) -> Result<Validation> {
        let files = self.client.list_vector_store_files(vector_store_id).await?;
        let failed: Vec<String> = files
            .into_iter()
            .filter(|file| file.status == VectorStoreFileStatus::Failed)
            .map(|file| file.id)
            .collect();

        if failed.is_empty() {
            return Ok(Validation::Clean);
        }

        let mut failed_names = Vec::new();
        for file_id in &failed {
            let file = self.client.get_file(file_id).await?;
            failed_names.push(base_name(Path::new(&file.filename)));
        }
        let failed_paths: Vec<PathBuf> = self
            .local_file_paths()?
            .into_iter()
            .filter(|path| failed_names.contains(&base_name(path)))
            .collect();

        for file_id in &failed {
            self.client
                .delete_vector_store_file(vector_store_id, file_id)
                .await?;
            self.client.delete_file(file_id).await?;
        }

        let recreated = self.upload_files(&failed_paths).await?;
        for file_id in &recreated {
            self.client
                .attach_file_to_vector_store(vector_store_id, file_id)
                .await?;
        }
        self.wait_until_ready(vector_store_id).await?;

        Ok(Validation::Repaired {
            count: failed.len(),
        })
    }

    /// Ids of the uploaded retrieval files, uploading the staged local files
    /// when none match the prefix yet.
    pub async fn retrieval_file_ids(&self) -> Result<Vec<String>> {
        let existing = self.find_existing_retrieval_files().await?;
        if !existing.is_empty() {
            return Ok(existing);
        }
        self.create_retrieval_files().await
    }

    async fn find_existing_retrieval_files(&self) -> Result<Vec<String>> {
        let files = self.client.list_files().await?;
        Ok(files
            .into_iter()
            .filter(|file| file.filename.starts_with(&self.data_file_prefix))
            .map(|file| file.id)
            .collect())
    }

    async fn create_retrieval_files(&self) -> Result<Vec<String>> {
        log::info!("Creating new retrieval files");
        let paths = self.local_file_paths()?;
        self.upload_files(&paths).await
    }

    fn local_file_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.bin_dir) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if name.starts_with('.') || name.ends_with(".DS_Store") {
                continue;
            }
            paths.push(entry.into_path());
        }
        paths.sort();
        Ok(paths)
    }

    async fn upload_files(&self, paths: &[PathBuf]) -> Result<Vec<String>> {
        let mut file_ids = Vec::new();
        for path in paths {
            let bytes = tokio::fs::read(path).await?;
            let file = self.client.upload_file(&base_name(path), bytes).await?;
            file_ids.push(file.id);
        }
        Ok(file_ids)
    }

    /// Deletes the assistant, its vector stores, and its retrieval files.
    /// Idempotent: issues no calls for resources that do not exist. Each
    /// family is deleted independently, so a failure partway leaves the
    /// remainder in place.
    pub async fn delete_assistant(&self) -> Result<()> {
        log::info!(
            "Removing existing {} and retrieval files",
            self.assistant_name
        );

        if let Some(assistant_id) = self.find_existing_assistant().await? {
            self.client.delete_assistant(&assistant_id).await?;
        }
        for vector_store_id in self.find_existing_vector_stores().await? {
            self.client.delete_vector_store(&vector_store_id).await?;
        }
        for file_id in self.find_existing_retrieval_files().await? {
            self.client.delete_file(&file_id).await?;
        }
        Ok(())
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
