//! JSON file listing every ingested source

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::{DocumentChunk, DomainError, StoredDocumentRecord};

/// The metadata file, rewritten whole after every insertion
#[derive(Debug, Clone)]
pub struct MetadataFile {
    path: PathBuf,
}

impl MetadataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records; a missing file is empty and a corrupt one is logged and treated as empty
    pub async fn load(&self) -> Vec<StoredDocumentRecord> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read metadata file");
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Corrupt metadata file, ignoring");
            Vec::new()
        })
    }

    /// Replace the file with one record per saved file in `chunks`
    pub async fn save(&self, chunks: &[DocumentChunk]) -> Result<(), DomainError> {
        let records = records_for(chunks);

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            DomainError::storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let raw = serde_json::to_string_pretty(&records)
            .map_err(|e| DomainError::storage(format!("Failed to serialize metadata: {}", e)))?;

        let tmp_path = dir.join(format!(".metadata.tmp-{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp_path, raw).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(DomainError::storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }

        Ok(())
    }
}

/// One record per saved file, in first-seen order
///
/// Keyed by storage path: two uploads sharing a filename are saved to
/// distinct paths and both are kept.
pub fn records_for(chunks: &[DocumentChunk]) -> Vec<StoredDocumentRecord> {
    let mut records: Vec<StoredDocumentRecord> = Vec::new();

    for chunk in chunks {
        if !records.iter().any(|r| r.file_path == chunk.metadata.file_path) {
            records.push(StoredDocumentRecord::from_chunk_metadata(&chunk.metadata));
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, ChunkMetadata};

    fn chunk(text: &str, source: &str, category: Category) -> DocumentChunk {
        DocumentChunk::new(
            text,
            ChunkMetadata::new(source, category, "txt", format!("/files/{}", source)),
        )
        .unwrap()
    }

    #[test]
    fn test_records_deduplicate_sources() {
        let chunks = vec![
            chunk("a", "one.txt", Category::Legal),
            chunk("b", "two.txt", Category::Medical),
            chunk("c", "one.txt", Category::Legal),
        ];

        let records = records_for(&chunks);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].filename, "one.txt");
        assert_eq!(records[1].metadata.category, Category::Medical);
    }

    #[test]
    fn test_same_filename_saved_twice_keeps_both() {
        let first = ChunkMetadata::new("lease.txt", Category::Legal, "txt", "/files/Lawyer/lease_1.txt");
        let second = ChunkMetadata::new("lease.txt", Category::Legal, "txt", "/files/Lawyer/lease_2.txt");
        let chunks = vec![
            DocumentChunk::new("first lease", first).unwrap(),
            DocumentChunk::new("second lease", second).unwrap(),
        ];

        let records = records_for(&chunks);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].file_path, "/files/Lawyer/lease_1.txt");
        assert_eq!(records[1].file_path, "/files/Lawyer/lease_2.txt");
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = MetadataFile::new(dir.path().join("nested/documents_metadata.json"));

        file.save(&[chunk("text", "guide.txt", Category::Engineering)])
            .await
            .unwrap();
        let records = file.load().await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_path, "/files/guide.txt");

        let raw = std::fs::read_to_string(file.path()).unwrap();
        assert!(raw.contains("\n  {"), "expected pretty JSON: {}", raw);
    }

    #[tokio::test]
    async fn test_missing_and_corrupt_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = MetadataFile::new(dir.path().join("documents_metadata.json"));

        assert!(file.load().await.is_empty());

        std::fs::write(file.path(), "{ not json").unwrap();
        assert!(file.load().await.is_empty());
    }
}
