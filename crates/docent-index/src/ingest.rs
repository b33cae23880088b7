//! Documentation ingestion: walk → load → chunk → embed → store.

use std::path::Path;

use docent_llm::EmbeddingProvider;

use crate::chunker::MarkdownChunker;
use crate::error::{IndexError, Result};
use crate::loader::{TextLoader, is_markdown};
use crate::store::ChunkStore;

/// Summary of an ingestion run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub files_scanned: usize,
    pub files_ingested: usize,
    pub chunks_created: usize,
    pub duration_ms: u64,
}

/// Feeds Markdown documents into a [`ChunkStore`].
///
/// Any embedding failure aborts the run; chunks of the failing file are not
/// stored. Persisting the store is left to the caller.
pub struct Ingestor<'a, P> {
    store: &'a ChunkStore<P>,
    chunker: MarkdownChunker,
    loader: TextLoader,
}

impl<'a, P: EmbeddingProvider> Ingestor<'a, P> {
    #[must_use]
    pub fn new(store: &'a ChunkStore<P>, chunker: MarkdownChunker) -> Self {
        Self {
            store,
            chunker,
            loader: TextLoader::default(),
        }
    }

    /// Ingest every Markdown file under `root` in file-name order.
    ///
    /// Sources are recorded relative to `root`. Hidden files and gitignored
    /// paths are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first walk, load, embedding or store error encountered.
    pub async fn ingest_dir(&self, root: &Path) -> Result<IngestReport> {
        let start = std::time::Instant::now();
        let mut report = IngestReport::default();

        let mut entries = Vec::new();
        for entry in ignore::WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
        {
            let entry = entry?;
            if entry.file_type().is_some_and(|ft| ft.is_file()) && is_markdown(entry.path()) {
                entries.push(entry);
            }
        }

        let total = entries.len();
        tracing::info!(root = %root.display(), total, "ingestion started");

        for (i, entry) in entries.iter().enumerate() {
            report.files_scanned += 1;
            let rel_path = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");

            let created = self.ingest_file(entry.path(), &rel_path).await?;
            if created > 0 {
                report.files_ingested += 1;
            }
            report.chunks_created += created;
            tracing::info!(
                file = %rel_path,
                progress = format_args!("{}/{total}", i + 1),
                created,
            );
        }

        report.duration_ms = start.elapsed().as_millis().try_into().unwrap_or(u64::MAX);
        Ok(report)
    }

    /// Ingest one file, recording it under `source`. Returns the number of
    /// chunks stored.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or any chunk cannot be embedded.
    pub async fn ingest_file(&self, path: &Path, source: &str) -> Result<usize> {
        let document = self.loader.load(path, source).await?;
        let mut chunks = self.chunker.process(&document.content, &document.metadata);

        for chunk in &mut chunks {
            chunk.embedding = self
                .store
                .provider()
                .embed(&chunk.content)
                .await
                .map_err(|error| IndexError::Embedding {
                    source_path: source.to_owned(),
                    chunk: chunk.id(),
                    error,
                })?;
        }

        let created = chunks.len();
        self.store.store_all(chunks)?;
        tracing::debug!("{source}: {created} chunks stored");
        Ok(created)
    }
}
