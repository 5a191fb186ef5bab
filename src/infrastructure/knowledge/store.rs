//! Knowledge store: in-memory chunk list, metadata file and optional vector backend

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::domain::ingestion::{file_extension, ChunkingConfig, TextSplitter};
use crate::domain::{
    Category, CollectionKey, DistanceMetric, DocumentChunk, DomainError, EmbeddingProvider,
    KnowledgeSource, Scope, VectorIndex, VectorPoint,
};
use crate::infrastructure::ingestion::{build_chunks, extract_document};

use super::lexical::LexicalScoring;
use super::metadata_file::MetadataFile;

const UPLOADED_SOURCE_TYPE: &str = "pdf";

/// Chunk count of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub chunks: usize,
}

/// Snapshot of what the store holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_chunks: usize,
    pub by_category: Vec<CategoryCount>,
    pub sources: usize,
    pub vector_mode: bool,
}

/// Owned knowledge store shared by `Arc`
///
/// Vector search is used when both an embedding provider and a vector index
/// are configured and the index answered the startup health check. Every
/// other path degrades to lexical search over the in-memory chunks.
#[derive(Debug)]
pub struct KnowledgeStore {
    chunks: RwLock<Vec<DocumentChunk>>,
    metadata: MetadataFile,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
    vector_enabled: AtomicBool,
    scoring: LexicalScoring,
}

impl KnowledgeStore {
    /// Lexical-only store persisting metadata to `metadata`
    pub fn new(metadata: MetadataFile) -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
            metadata,
            embedder: None,
            index: None,
            vector_enabled: AtomicBool::new(false),
            scoring: LexicalScoring::default(),
        }
    }

    pub fn with_vector_backend(
        mut self,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        self.embedder = Some(embedder);
        self.index = Some(index);
        self.vector_enabled = AtomicBool::new(true);
        self
    }

    pub fn with_scoring(mut self, scoring: LexicalScoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Probe the vector index; an unreachable index disables vector mode
    pub async fn connect(&self) -> bool {
        let Some(index) = &self.index else {
            info!("No vector backend configured, using local search");
            return false;
        };

        match index.health_check().await {
            Ok(()) => {
                info!("Vector backend reachable, vector search enabled");
                self.vector_enabled.store(true, Ordering::SeqCst);
                true
            }
            Err(e) => {
                warn!(error = %e, "Vector backend unreachable, falling back to local search");
                self.vector_enabled.store(false, Ordering::SeqCst);
                false
            }
        }
    }

    pub fn vector_mode(&self) -> bool {
        self.vector_backend().is_some()
    }

    fn vector_backend(&self) -> Option<(&Arc<dyn EmbeddingProvider>, &Arc<dyn VectorIndex>)> {
        if !self.vector_enabled.load(Ordering::SeqCst) {
            return None;
        }

        self.embedder.as_ref().zip(self.index.as_ref())
    }

    pub fn metadata_path(&self) -> &Path {
        self.metadata.path()
    }

    /// Insert chunks of one document under `category` and `scope`
    ///
    /// Returns `false` when there is nothing to insert or the metadata file
    /// could not be written; in the latter case the chunks are dropped again.
    /// Vector indexing failures are logged only.
    pub async fn add_chunks(
        &self,
        chunks: Vec<DocumentChunk>,
        category: Category,
        scope: &Scope,
    ) -> bool {
        if chunks.is_empty() {
            warn!(category = %category, scope = %scope, "No chunks to add");
            return false;
        }

        let stamped: Vec<DocumentChunk> = chunks
            .into_iter()
            .map(|mut chunk| {
                chunk.metadata.category = category;
                chunk.metadata.scope = scope.to_string();
                chunk.metadata.source_type = UPLOADED_SOURCE_TYPE.to_string();
                chunk
            })
            .collect();

        {
            let mut stored = self.chunks.write().await;
            let before = stored.len();
            stored.extend(stamped.iter().cloned());

            if let Err(e) = self.metadata.save(&stored).await {
                error!(error = %e, "Failed to persist document metadata");
                stored.truncate(before);
                return false;
            }
        }

        info!(
            category = %category,
            scope = %scope,
            chunks = stamped.len(),
            "Chunks added to local store"
        );

        if let Some((embedder, index)) = self.vector_backend() {
            let key = CollectionKey::new(scope.clone(), category);

            if let Err(e) = index_chunks(embedder.as_ref(), index.as_ref(), &key, &stamped).await {
                warn!(
                    collection = %key.collection_name(),
                    error = %e,
                    "Vector indexing failed, chunks remain searchable locally"
                );
            }
        }

        true
    }

    /// Rendered context for `query` in `category` and `scope`
    pub async fn search(
        &self,
        query: &str,
        category: Category,
        scope: &Scope,
        top_k: usize,
    ) -> String {
        if let Some((embedder, index)) = self.vector_backend() {
            let key = CollectionKey::new(scope.clone(), category);

            match vector_search(embedder.as_ref(), index.as_ref(), &key, query, top_k).await {
                Ok(Some(text)) => return text,
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        collection = %key.collection_name(),
                        error = %e,
                        "Vector search failed, falling back to local search"
                    );
                }
            }
        }

        let chunks = self.chunks.read().await;
        self.scoring.search(&chunks, query, category, scope, top_k)
    }

    /// Re-derive chunks of every previously ingested file
    ///
    /// Files that no longer exist or yield no text are skipped. Returns the
    /// number of chunks restored.
    pub async fn load_existing(&self, splitter: &dyn TextSplitter, chunking: &ChunkingConfig) -> usize {
        let records = self.metadata.load().await;
        let mut restored = Vec::new();

        for record in &records {
            let path = Path::new(&record.file_path);

            let bytes = match tokio::fs::read(path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(source = %record.filename, path = %path.display(), error = %e, "Skipping missing document");
                    continue;
                }
            };

            let extension = file_extension(&record.file_path);
            let document = match extract_document(Arc::new(bytes), &extension).await {
                Ok(document) if document.has_content() => document,
                Ok(_) => {
                    warn!(source = %record.filename, "Skipping document without text");
                    continue;
                }
                Err(e) => {
                    warn!(source = %record.filename, error = %e, "Skipping unreadable document");
                    continue;
                }
            };

            match build_chunks(&document, &record.chunk_metadata(), splitter, chunking) {
                Ok(chunks) => {
                    debug!(source = %record.filename, chunks = chunks.len(), "Document restored");
                    restored.extend(chunks);
                }
                Err(e) => warn!(source = %record.filename, error = %e, "Skipping document"),
            }
        }

        let count = restored.len();
        self.chunks.write().await.extend(restored);

        info!(documents = records.len(), chunks = count, "Loaded existing documents");
        count
    }

    pub async fn stats(&self) -> StoreStats {
        let chunks = self.chunks.read().await;

        let by_category = Category::all()
            .into_iter()
            .map(|category| CategoryCount {
                category,
                chunks: chunks.iter().filter(|c| c.category() == category).count(),
            })
            .collect();

        let mut sources: Vec<&str> = chunks.iter().map(|c| c.metadata.file_path.as_str()).collect();
        sources.sort_unstable();
        sources.dedup();

        StoreStats {
            total_chunks: chunks.len(),
            by_category,
            sources: sources.len(),
            vector_mode: self.vector_mode(),
        }
    }

    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chunks.read().await.is_empty()
    }
}

async fn index_chunks(
    embedder: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
    key: &CollectionKey,
    chunks: &[DocumentChunk],
) -> Result<(), DomainError> {
    let name = key.collection_name();

    if !index.collection_exists(&name).await? {
        index
            .create_collection(&name, embedder.dimensions(), DistanceMetric::Cosine)
            .await?;
        info!(collection = %name, dimension = embedder.dimensions(), "Created collection");
    }

    let mut points = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let vector = embedder.embed_text(chunk.text()).await?;
        points.push(
            VectorPoint::new(vector)
                .with_payload("text", chunk.text())
                .with_payload("category", chunk.category().as_str())
                .with_payload("source", chunk.source())
                .with_payload("source_type", chunk.metadata.source_type.as_str()),
        );
    }

    let count = points.len();
    index.upsert(&name, points).await?;
    debug!(collection = %name, points = count, "Upserted vectors");

    Ok(())
}

/// `None` when the collection is missing or returned nothing
async fn vector_search(
    embedder: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
    key: &CollectionKey,
    query: &str,
    top_k: usize,
) -> Result<Option<String>, DomainError> {
    let name = key.collection_name();

    if !index.collection_exists(&name).await? {
        debug!(collection = %name, "Collection missing, using local search");
        return Ok(None);
    }

    let vector = embedder.embed_text(query).await?;
    let hits = index.search(&name, vector, top_k).await?;

    let texts: Vec<&str> = hits.iter().filter_map(|hit| hit.text()).collect();
    if texts.is_empty() {
        debug!(collection = %name, "No vector hits, using local search");
        return Ok(None);
    }

    Ok(Some(texts.join(" ")))
}

#[async_trait]
impl KnowledgeSource for KnowledgeStore {
    async fn search(
        &self,
        query: &str,
        category: Category,
        scope: &Scope,
        top_k: usize,
    ) -> Result<String, DomainError> {
        Ok(KnowledgeStore::search(self, query, category, scope, top_k).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::knowledge::{MockVectorIndex, NO_DOCUMENTS_UPLOADED};
    use crate::domain::ChunkMetadata;
    use crate::infrastructure::ingestion::RecursiveChunker;
    use crate::infrastructure::vector::InMemoryVectorIndex;

    fn chunk(text: &str, source: &str) -> DocumentChunk {
        DocumentChunk::new(
            text,
            ChunkMetadata::new(source, Category::Engineering, "txt", format!("/files/{}", source)),
        )
        .unwrap()
    }

    fn store_in(dir: &tempfile::TempDir) -> KnowledgeStore {
        KnowledgeStore::new(MetadataFile::new(dir.path().join("documents_metadata.json")))
    }

    #[tokio::test]
    async fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let result = store.search("docker", Category::Engineering, &Scope::default(), 3).await;

        assert_eq!(result, NO_DOCUMENTS_UPLOADED);
        assert!(!store.vector_mode());
    }

    #[tokio::test]
    async fn test_add_stamps_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let scope = Scope::new("alice");

        let added = store
            .add_chunks(
                vec![chunk("deploy the service with docker", "ops.txt")],
                Category::Engineering,
                &scope,
            )
            .await;

        assert!(added);
        let result = store
            .search("deploy service docker", Category::Engineering, &scope, 3)
            .await;
        assert_eq!(result, "From ops.txt: deploy the service with docker");

        let records = store.metadata.load().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "ops.txt");
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .add_chunks(
                vec![chunk("kubernetes rollout strategy", "k8s.txt")],
                Category::Engineering,
                &Scope::new("alice"),
            )
            .await;

        let result = store
            .search("kubernetes rollout", Category::Engineering, &Scope::new("bob"), 3)
            .await;

        assert_eq!(result, "No relevant content found in engineering documents.");
    }

    #[tokio::test]
    async fn test_category_is_stamped_on_insert() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .add_chunks(
                vec![chunk("ankle sprain treatment", "care.txt")],
                Category::Medical,
                &Scope::default(),
            )
            .await;

        let engineering = store
            .search("ankle sprain", Category::Engineering, &Scope::default(), 3)
            .await;
        let medical = store
            .search("ankle sprain", Category::Medical, &Scope::default(), 3)
            .await;

        assert!(engineering.starts_with("No relevant content"));
        assert!(medical.contains("ankle sprain treatment"));
    }

    #[tokio::test]
    async fn test_empty_insert_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(!store.add_chunks(vec![], Category::Legal, &Scope::default()).await);
    }

    #[tokio::test]
    async fn test_metadata_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::new(MetadataFile::new(dir.path()));

        let added = store
            .add_chunks(vec![chunk("text", "a.txt")], Category::Legal, &Scope::default())
            .await;

        assert!(!added);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_vector_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let index = Arc::new(InMemoryVectorIndex::new());
        let store = store_in(&dir)
            .with_vector_backend(Arc::new(MockEmbeddingProvider::new(16)), index.clone());
        assert!(store.connect().await);

        let scope = Scope::new("alice");
        store
            .add_chunks(
                vec![
                    chunk("rest ice compression elevation", "first-aid.txt"),
                    chunk("wash hands before meals", "hygiene.txt"),
                ],
                Category::Medical,
                &scope,
            )
            .await;

        assert_eq!(index.len("user_alice_doctor_knowledge").await, Some(2));

        let result = store
            .search("rest ice compression elevation", Category::Medical, &scope, 1)
            .await;
        assert_eq!(result, "rest ice compression elevation");
    }

    #[tokio::test]
    async fn test_missing_collection_falls_back_to_local() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = MockVectorIndex::new();
        index.expect_health_check().returning(|| Ok(()));
        index.expect_collection_exists().returning(|_| Ok(false));
        index.expect_create_collection().returning(|_, _, _| Err(DomainError::vector_index("refused")));
        index.expect_search().never();

        let store = store_in(&dir)
            .with_vector_backend(Arc::new(MockEmbeddingProvider::new(8)), Arc::new(index));
        assert!(store.connect().await);

        store
            .add_chunks(vec![chunk("terraform plan output", "iac.txt")], Category::Engineering, &Scope::default())
            .await;
        let result = store
            .search("terraform plan", Category::Engineering, &Scope::default(), 3)
            .await;

        assert_eq!(result, "From iac.txt: terraform plan output");
    }

    #[tokio::test]
    async fn test_embedding_failure_keeps_local_copy() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).with_vector_backend(
            Arc::new(MockEmbeddingProvider::new(8).with_error("offline")),
            Arc::new(InMemoryVectorIndex::new()),
        );

        let added = store
            .add_chunks(vec![chunk("helm chart values", "helm.txt")], Category::Engineering, &Scope::default())
            .await;
        let result = store.search("helm chart", Category::Engineering, &Scope::default(), 3).await;

        assert!(added);
        assert_eq!(result, "From helm.txt: helm chart values");
    }

    #[tokio::test]
    async fn test_unreachable_index_disables_vector_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = MockVectorIndex::new();
        index
            .expect_health_check()
            .returning(|| Err(DomainError::vector_index("connection refused")));
        index.expect_collection_exists().never();

        let store = store_in(&dir)
            .with_vector_backend(Arc::new(MockEmbeddingProvider::new(8)), Arc::new(index));

        assert!(!store.connect().await);
        assert!(!store.vector_mode());
        store
            .add_chunks(vec![chunk("nginx config", "web.txt")], Category::Engineering, &Scope::default())
            .await;
    }

    #[tokio::test]
    async fn test_load_existing_rechunks_saved_files() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("Lawyer").join("nda_1700000000.txt");
        std::fs::create_dir_all(saved.parent().unwrap()).unwrap();
        std::fs::write(&saved, "Confidential information must not be disclosed.").unwrap();

        let meta = ChunkMetadata::new("nda.txt", Category::Legal, "txt", saved.to_string_lossy());
        let gone = ChunkMetadata::new("old.txt", Category::Legal, "txt", "/nonexistent/old.txt");
        let first = store_in(&dir);
        first
            .add_chunks(
                vec![
                    DocumentChunk::new("Confidential information", meta).unwrap(),
                    DocumentChunk::new("obsolete", gone).unwrap(),
                ],
                Category::Legal,
                &Scope::default(),
            )
            .await;

        let second = store_in(&dir);
        let restored = second
            .load_existing(&RecursiveChunker::new(), &ChunkingConfig::default())
            .await;

        assert_eq!(restored, 1);
        let result = second
            .search("confidential disclosed", Category::Legal, &Scope::default(), 3)
            .await;
        assert!(result.starts_with("From nda.txt: Confidential information"));
    }

    fn saved_file(dir: &tempfile::TempDir, relative: &str, body: &str) -> String {
        let path = dir.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_load_existing_keeps_scope() {
        let dir = tempfile::tempdir().unwrap();
        let path = saved_file(&dir, "Doctor/notes_1.txt", "Alice private sprained ankle protocol");
        let meta = ChunkMetadata::new("notes.txt", Category::Medical, "txt", path);

        store_in(&dir)
            .add_chunks(
                vec![DocumentChunk::new("Alice private sprained ankle protocol", meta).unwrap()],
                Category::Medical,
                &Scope::new("alice"),
            )
            .await;

        let restarted = store_in(&dir);
        restarted
            .load_existing(&RecursiveChunker::new(), &ChunkingConfig::default())
            .await;

        let own = restarted
            .search("ankle protocol", Category::Medical, &Scope::new("alice"), 3)
            .await;
        let other = restarted
            .search("ankle protocol", Category::Medical, &Scope::default(), 3)
            .await;

        assert_eq!(own, "From notes.txt: Alice private sprained ankle protocol");
        assert_eq!(other, "No relevant content found in medical documents.");
    }

    #[tokio::test]
    async fn test_load_existing_restores_same_named_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let first = saved_file(&dir, "Lawyer/lease_1.txt", "First lease about parking spaces");
        let second = saved_file(&dir, "Lawyer/lease_2.txt", "Second lease about swimming pools");
        let store = store_in(&dir);

        for (path, text) in [
            (first, "First lease about parking spaces"),
            (second, "Second lease about swimming pools"),
        ] {
            let meta = ChunkMetadata::new("lease.txt", Category::Legal, "txt", path);
            store
                .add_chunks(vec![DocumentChunk::new(text, meta).unwrap()], Category::Legal, &Scope::default())
                .await;
        }

        let restarted = store_in(&dir);
        let restored = restarted
            .load_existing(&RecursiveChunker::new(), &ChunkingConfig::default())
            .await;

        assert_eq!(restored, 2);
        let result = restarted
            .search("swimming pools", Category::Legal, &Scope::default(), 3)
            .await;
        assert_eq!(result, "From lease.txt: Second lease about swimming pools");
    }

    #[tokio::test]
    async fn test_corrupt_metadata_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("documents_metadata.json"), "{not json").unwrap();

        let store = store_in(&dir);

        assert_eq!(
            store.load_existing(&RecursiveChunker::new(), &ChunkingConfig::default()).await,
            0
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_stats() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .add_chunks(
                vec![chunk("one", "a.txt"), chunk("two", "a.txt"), chunk("three", "b.txt")],
                Category::Legal,
                &Scope::default(),
            )
            .await;

        let stats = store.stats().await;

        assert_eq!(stats.total_chunks, 3);
        assert_eq!(stats.sources, 2);
        assert_eq!(
            stats.by_category,
            vec![
                CategoryCount { category: Category::Engineering, chunks: 0 },
                CategoryCount { category: Category::Medical, chunks: 0 },
                CategoryCount { category: Category::Legal, chunks: 3 },
            ]
        );
        assert!(!stats.vector_mode);
    }
}
