use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::exporters::create_dir;
use crate::Result;

/// Copies a staged file from the data directory into the upload directory,
/// renamed with the data file prefix.
pub struct FilesExporter {
    file_name: String,
    directory: String,
    bin_dir: PathBuf,
    data_dir: PathBuf,
    data_file_prefix: String,
}

impl FilesExporter {
    pub fn new(file_name: impl Into<String>, config: &Config) -> Self {
        Self {
            file_name: file_name.into(),
            directory: "files".to_string(),
            bin_dir: PathBuf::from(&config.bin_dir),
            data_dir: PathBuf::from(&config.data_dir),
            data_file_prefix: config.data_file_prefix.clone(),
        }
    }

    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Copies the file unless the target already exists.
    pub fn export(&self) -> Result<()> {
        if self.file_path().exists() {
            log::info!("{} data exists. Skipping export.", self.stem());
            return Ok(());
        }

        log::info!("Exporting {} data", self.stem());
        create_dir(&self.dir_path())?;

        let source = self.data_dir.join(&self.directory).join(&self.file_name);
        std::fs::copy(&source, self.file_path())?;
        log::info!(
            "{} data written to file: {}",
            self.stem(),
            self.file_path().display()
        );
        Ok(())
    }

    pub fn file_path(&self) -> PathBuf {
        self.dir_path()
            .join(format!("{}_{}", self.data_file_prefix, self.file_name))
    }

    fn dir_path(&self) -> PathBuf {
        self.bin_dir.join(&self.directory)
    }

    fn stem(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
