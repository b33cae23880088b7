//! In-memory chunk collection with JSON persistence and boosted search.

use std::path::Path;
use std::sync::{Mutex, RwLock};

use docent_llm::EmbeddingProvider;
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::query::QueryIntent;
use crate::similarity::cosine_similarity;
use crate::types::{Chunk, ScoredChunk};

/// Current on-disk layout version.
pub const STORE_VERSION: u32 = 1;

/// Boosted scores at or below this are never returned.
pub const MIN_SCORE: f32 = 0.1;

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    chunks: &'a [Chunk],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoreFile {
    Versioned { version: u32, chunks: Vec<Chunk> },
    Legacy(Vec<Chunk>),
}

/// Chunk collection owned by one process; cheap to share behind `Arc`.
pub struct ChunkStore<P> {
    provider: P,
    chunks: RwLock<Vec<Chunk>>,
    write_lock: Mutex<()>,
}

impl<P> std::fmt::Debug for ChunkStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStore")
            .field("chunks", &self.chunks.read().map(|c| c.len()).ok())
            .finish_non_exhaustive()
    }
}

impl<P: EmbeddingProvider> ChunkStore<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            chunks: RwLock::new(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Append a chunk. Storing the same chunk twice keeps both copies.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection lock is poisoned.
    pub fn store(&self, chunk: Chunk) -> Result<()> {
        self.write()?.push(chunk);
        Ok(())
    }

    /// Append several chunks under one lock acquisition.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection lock is poisoned.
    pub fn store_all(&self, chunks: impl IntoIterator<Item = Chunk>) -> Result<()> {
        self.write()?.extend(chunks);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the collection lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// # Errors
    ///
    /// Returns an error if the collection lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Snapshot of every stored chunk in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection lock is poisoned.
    pub fn chunks(&self) -> Result<Vec<Chunk>> {
        Ok(self.read()?.clone())
    }

    /// Embed `query` and return up to `limit` ranked chunks.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::QueryEmbedding` if the provider fails.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<ScoredChunk>> {
        let query_vector = self
            .provider
            .embed(query)
            .await
            .map_err(IndexError::QueryEmbedding)?;
        self.rank(query, &query_vector, limit)
    }

    /// Rank stored chunks against an already embedded query.
    ///
    /// Cosine similarity is boosted by the detected target command and
    /// section types, scores at or below [`MIN_SCORE`] are discarded, and the
    /// result holds at most one chunk per section type.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection lock is poisoned.
    pub fn rank(
        &self,
        query: &str,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredChunk>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let intent = QueryIntent::detect(query);
        tracing::debug!(
            target_command = ?intent.target_command,
            target_types = ?intent.target_types,
            "query intent"
        );

        let mut candidates: Vec<ScoredChunk> = {
            let chunks = self.read()?;
            chunks
                .iter()
                .filter_map(|chunk| {
                    let score = cosine_similarity(query_vector, &chunk.embedding)
                        * intent.command_boost(&chunk.metadata.command)
                        * intent.type_boost(chunk.metadata.section_type);
                    (score > MIN_SCORE).then(|| ScoredChunk {
                        chunk: chunk.clone(),
                        score,
                    })
                })
                .collect()
        };
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        tracing::debug!(candidates = candidates.len(), "scored chunks");

        Ok(compose(candidates, &intent, limit))
    }

    /// Replace the collection with the contents of `path`.
    ///
    /// A missing file yields an empty store. Returns the number of chunks loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid store
    /// file, or was written by a newer version.
    pub fn load(&self, path: &Path) -> Result<usize> {
        let chunks = match std::fs::read_to_string(path) {
            Ok(text) => parse_store_file(&text, path)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no chunk store file, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        let count = chunks.len();
        *self.write()? = chunks;
        tracing::info!(path = %path.display(), count, "chunk store loaded");
        Ok(count)
    }

    /// Persist every chunk to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem step fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| IndexError::Lock(e.to_string()))?;

        let json = {
            let chunks = self.read()?;
            serde_json::to_string(&StoreFileRef {
                version: STORE_VERSION,
                chunks: &chunks,
            })?
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        tracing::info!(path = %path.display(), "chunk store saved");
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Chunk>>> {
        self.chunks
            .read()
            .map_err(|e| IndexError::Lock(e.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Chunk>>> {
        self.chunks
            .write()
            .map_err(|e| IndexError::Lock(e.to_string()))
    }
}

fn parse_store_file(text: &str, path: &Path) -> Result<Vec<Chunk>> {
    match serde_json::from_str::<StoreFile>(text)? {
        StoreFile::Versioned { version, chunks } => {
            if version > STORE_VERSION {
                return Err(IndexError::UnsupportedVersion {
                    found: version,
                    supported: STORE_VERSION,
                });
            }
            Ok(chunks)
        }
        StoreFile::Legacy(chunks) => {
            tracing::warn!(
                path = %path.display(),
                "unversioned chunk store, will be upgraded on next save"
            );
            Ok(chunks)
        }
    }
}

/// Pick the final result from score-sorted candidates.
///
/// First, one chunk per target type from the target command's documentation,
/// in priority order. Then the best remaining chunks whose section type is not
/// yet represented.
fn compose(candidates: Vec<ScoredChunk>, intent: &QueryIntent, limit: usize) -> Vec<ScoredChunk> {
    let mut taken = vec![false; candidates.len()];
    let mut picked: Vec<usize> = Vec::with_capacity(limit);

    if let Some(command) = &intent.target_command {
        for ty in &intent.target_types {
            if picked.len() >= limit {
                break;
            }
            let best = (0..candidates.len()).find(|&i| {
                let meta = &candidates[i].chunk.metadata;
                !taken[i] && meta.command == *command && meta.section_type == *ty
            });
            if let Some(i) = best {
                taken[i] = true;
                picked.push(i);
            }
        }
    }

    for i in 0..candidates.len() {
        if picked.len() >= limit {
            break;
        }
        if taken[i] {
            continue;
        }
        let ty = candidates[i].chunk.metadata.section_type;
        if picked
            .iter()
            .any(|&p| candidates[p].chunk.metadata.section_type == ty)
        {
            continue;
        }
        taken[i] = true;
        picked.push(i);
    }

    let mut slots: Vec<Option<ScoredChunk>> = candidates.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}
