//! Size-capped loading of Markdown documents from disk.

use std::path::Path;

use crate::error::{IndexError, Result};
use crate::types::DocumentMetadata;

/// Files larger than this are refused (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Extensions treated as Markdown documentation.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// Reads a UTF-8 text document from disk with a size cap.
#[derive(Debug, Clone)]
pub struct TextLoader {
    pub max_file_size: u64,
}

impl Default for TextLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl TextLoader {
    /// Load `path`, recording `source` as the document's origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, not UTF-8, or
    /// larger than `max_file_size`.
    pub async fn load(&self, path: &Path, source: &str) -> Result<Document> {
        let meta = tokio::fs::metadata(path).await?;
        if meta.len() > self.max_file_size {
            return Err(IndexError::FileTooLarge {
                path: path.display().to_string(),
                size: meta.len(),
                limit: self.max_file_size,
            });
        }

        let content = tokio::fs::read_to_string(path).await?;
        Ok(Document {
            content,
            metadata: DocumentMetadata::new(source),
        })
    }
}

#[must_use]
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|m| ext.eq_ignore_ascii_case(m))
        })
}
