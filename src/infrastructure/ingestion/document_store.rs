//! Category folders holding the raw uploaded files

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::ingestion::split_file_name;
use crate::domain::{Category, DomainError};

/// Saves uploads under `{root}/{Folder}/{stem}_{unix_ts}{ext}`
#[derive(Debug, Clone)]
pub struct DocumentFileStore {
    root: PathBuf,
}

impl DocumentFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn folder(&self, category: Category) -> PathBuf {
        self.root.join(category.folder_name())
    }

    /// Create the folder of every category
    pub async fn ensure_folders(&self) -> Result<(), DomainError> {
        for category in Category::all() {
            let folder = self.folder(category);
            tokio::fs::create_dir_all(&folder).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", folder.display(), e))
            })?;
            debug!(folder = %folder.display(), "Category folder ensured");
        }

        Ok(())
    }

    /// Write `bytes` to a fresh file in the category folder
    ///
    /// Never overwrites: a counter is appended when the timestamped name is taken.
    pub async fn save(
        &self,
        bytes: &[u8],
        filename: &str,
        category: Category,
    ) -> Result<PathBuf, DomainError> {
        let folder = self.folder(category);
        tokio::fs::create_dir_all(&folder).await?;

        let base_name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(filename);
        let (stem, ext) = split_file_name(base_name);
        let timestamp = chrono::Utc::now().timestamp();

        let mut counter = 0u32;
        loop {
            let candidate = if counter == 0 {
                format!("{}_{}{}", stem, timestamp, ext)
            } else {
                format!("{}_{}_{}{}", stem, timestamp, counter, ext)
            };
            let path = folder.join(candidate);

            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    use tokio::io::AsyncWriteExt;

                    file.write_all(bytes).await?;
                    file.flush().await?;
                    info!(path = %path.display(), category = %category, "Document saved");
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => counter += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
