//! Error types for docent-index.

use docent_llm::LlmError;

/// Errors that can occur while ingesting, persisting or searching chunks.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// IO error reading sources or the store file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The documentation directory could not be walked.
    #[error("directory walk failed: {0}")]
    Walk(#[from] ignore::Error),

    /// The search query could not be embedded.
    #[error("failed to generate query embedding")]
    QueryEmbedding(#[source] LlmError),

    /// A chunk could not be embedded during ingestion.
    #[error("failed to embed chunk {chunk} of {source_path}")]
    Embedding {
        source_path: String,
        chunk: String,
        #[source]
        error: LlmError,
    },

    /// The store file was written by a newer release.
    #[error("unsupported chunk store version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Source document exceeds the loader's size cap.
    #[error("{path} is {size} bytes, larger than the {limit} byte limit")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    /// A store lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    Lock(String),
}

/// Result type alias using `IndexError`.
pub type Result<T> = std::result::Result<T, IndexError>;
