use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::exporters::create_dir;
use crate::{Error, Result};

/// One staged content file: a date on the first line, the body after it, and
/// a three-character id prefix on the filename.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentData {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: String,
}

/// Converts a directory of staged content files into a single JSON document
/// in the upload directory, keyed by title.
pub struct DirectoryExporter {
    directory: String,
    bin_dir: PathBuf,
    data_dir: PathBuf,
    data_file_prefix: String,
}

impl DirectoryExporter {
    pub fn new(directory: impl Into<String>, config: &Config) -> Self {
        Self {
            directory: directory.into(),
            bin_dir: PathBuf::from(&config.bin_dir),
            data_dir: PathBuf::from(&config.data_dir),
            data_file_prefix: config.data_file_prefix.clone(),
        }
    }

    /// Writes the JSON document unless it already exists.
    pub fn export(&self) -> Result<()> {
        if self.file_path().exists() {
            log::info!(
                "Directory '{}' data exists. Skipping export.",
                self.directory
            );
            return Ok(());
        }

        log::info!("Exporting directory '{}' data", self.directory);
        create_dir(&self.dir_path())?;
        self.write_data()?;
        Ok(())
    }

    fn write_data(&self) -> Result<()> {
        let entries = self.load()?;
        let by_title: BTreeMap<String, ContentData> = entries
            .into_iter()
            .map(|entry| (entry.title.clone(), entry))
            .collect();

        let json = serde_json::to_string(&by_title)?;
        std::fs::write(self.file_path(), json)?;

        log::info!(
            "Directory '{}' data written to file: {}",
            self.directory,
            self.file_path().display()
        );
        Ok(())
    }

    fn load(&self) -> Result<Vec<ContentData>> {
        let mut names: Vec<String> = std::fs::read_dir(self.data_dir_path())?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        names.iter().map(|name| self.load_file(name)).collect()
    }

    fn load_file(&self, filename: &str) -> Result<ContentData> {
        let id: String = filename.chars().take(3).collect();
        let stem = Path::new(filename)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = stem.chars().skip(3).collect::<String>().trim().to_string();

        let raw = std::fs::read_to_string(self.data_dir_path().join(filename))?;
        let mut lines = raw.lines();
        let date_line = lines.next().unwrap_or("").trim();
        let body = lines
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ContentData {
            id,
            title,
            body,
            date: parse_date(date_line)?,
        })
    }

    pub fn file_path(&self) -> PathBuf {
        self.dir_path()
            .join(format!("{} - {}.json", self.data_file_prefix, self.directory))
    }

    fn dir_path(&self) -> PathBuf {
        self.bin_dir.join(&self.directory)
    }

    fn data_dir_path(&self) -> PathBuf {
        self.data_dir.join(&self.directory)
    }
}

/// Accepts the date formats seen in staged data and normalizes them to an
/// ISO datetime string.
fn parse_date(raw: &str) -> Result<String> {
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.naive_local().format("%Y-%m-%dT%H:%M:%S").to_string());
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(format!("{}T00:00:00", date.format("%Y-%m-%d")));
        }
    }

    Err(Error::InvalidDate(raw.to_string()))
}
