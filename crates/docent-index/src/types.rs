//! Chunk, metadata and section-type definitions shared across the index.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Coarse classification of a chunk derived from its heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Usage,
    Example,
    Flags,
    Command,
    Overview,
}

impl SectionType {
    /// Classify a heading by case-insensitive substring; first rule wins.
    #[must_use]
    pub fn from_topic(topic: &str) -> Self {
        let lower = topic.to_lowercase();
        if lower.contains("usage") {
            Self::Usage
        } else if lower.contains("example") {
            Self::Example
        } else if lower.contains("flag") {
            Self::Flags
        } else if lower.contains("command") {
            Self::Command
        } else {
            Self::Overview
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::Example => "example",
            Self::Flags => "flags",
            Self::Command => "command",
            Self::Overview => "overview",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata describing the document a chunk is cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub source: String,
}

impl DocumentMetadata {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Command name documented by this source: its file stem.
    #[must_use]
    pub fn command(&self) -> String {
        Path::new(&self.source)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    pub source: String,
    /// 1-based, inclusive.
    pub start_line: usize,
    /// 1-based, inclusive.
    pub end_line: usize,
    pub command: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[serde(default)]
    pub is_table: bool,
    #[serde(default)]
    pub is_code: bool,
    #[serde(default)]
    pub table_columns: Vec<String>,
}

/// A retrievable span of a document with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    #[serde(default)]
    pub embedding: Vec<f32>,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Stable identifier: `{source}:{start_line}-{end_line}`.
    #[must_use]
    pub fn id(&self) -> String {
        format!(
            "{}:{}-{}",
            self.metadata.source, self.metadata.start_line, self.metadata.end_line
        )
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.metadata.end_line + 1 - self.metadata.start_line
    }
}

/// A search hit with its boosted score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}
