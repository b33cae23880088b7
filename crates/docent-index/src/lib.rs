//! Markdown chunking, chunk storage and boosted semantic retrieval.
//!
//! Documents are split on headings into chunks that carry their command,
//! topic and section type. Search ranks chunks by cosine similarity, boosts
//! those matching the query's detected command and section types, and keeps
//! the result diverse across section types.

pub mod chunker;
pub mod context;
pub mod error;
pub mod ingest;
pub mod loader;
pub mod query;
pub mod similarity;
pub mod store;
pub mod types;

pub use chunker::{ChunkerConfig, MarkdownChunker};
pub use context::format_as_context;
pub use error::{IndexError, Result};
pub use ingest::{IngestReport, Ingestor};
pub use query::QueryIntent;
pub use similarity::cosine_similarity;
pub use store::ChunkStore;
pub use types::{Chunk, ChunkMetadata, DocumentMetadata, ScoredChunk, SectionType};
