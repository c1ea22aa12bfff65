use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use super::PersistenceBackend;
use crate::errors::{LinkmapError, Result};
use crate::storage::LinkData;

/// Pretty-printed JSON file.
///
/// Saves go to `<file>.tmp` first and are renamed over the target once
/// synced, so a crash mid-write leaves the previous file intact.
pub struct JsonFileBackend {
    file_path: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.file_path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl PersistenceBackend for JsonFileBackend {
    async fn load(&self) -> Result<LinkData> {
        let content = match tokio::fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "Data file {} not found, starting with empty store",
                    self.file_path.display()
                );
                return Ok(LinkData::new());
            }
            Err(e) => {
                error!("Failed to read data file {}: {}", self.file_path.display(), e);
                return Err(LinkmapError::file_operation(format!(
                    "Failed to read {}: {}",
                    self.file_path.display(),
                    e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(LinkData::new());
        }

        let data: LinkData = serde_json::from_str(&content).map_err(|e| {
            error!("Failed to parse data file {}: {}", self.file_path.display(), e);
            LinkmapError::serialization(format!(
                "Failed to parse {}: {}",
                self.file_path.display(),
                e
            ))
        })?;
        info!(
            "Loaded {} links from {}",
            data.len(),
            self.file_path.display()
        );
        Ok(data)
    }

    async fn save(&self, data: &LinkData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;

        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.file_path).await?;
        debug!(
            "Saved {} links to {}",
            data.len(),
            self.file_path.display()
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
