//! Line-oriented Markdown chunking on heading boundaries.
//!
//! Fenced code blocks and tables are kept intact: a `#` line inside either is
//! content, not a heading. Fences may be indented; headings and table rows
//! must start in the first column.

use crate::types::{Chunk, ChunkMetadata, DocumentMetadata, SectionType};

/// Chunker configuration.
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Chunks with fewer lines are dropped (default: 3).
    pub min_lines: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self { min_lines: 3 }
    }
}

/// Section being accumulated during the scan.
struct Section<'a> {
    lines: Vec<&'a str>,
    start_line: usize,
    topic: String,
    is_code: bool,
    is_table: bool,
    table_columns: Vec<String>,
}

impl<'a> Section<'a> {
    fn new(start_line: usize, topic: String) -> Self {
        Self {
            lines: Vec::new(),
            start_line,
            topic,
            is_code: false,
            is_table: false,
            table_columns: Vec::new(),
        }
    }

    fn push(&mut self, line: &'a str) {
        self.lines.push(line);
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkdownChunker {
    config: ChunkerConfig,
}

impl MarkdownChunker {
    #[must_use]
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split `content` into chunks with empty embeddings.
    ///
    /// Text before the first heading becomes an overview chunk with an empty
    /// topic. Sections shorter than `min_lines`, including the last one, are
    /// dropped.
    #[must_use]
    pub fn process(&self, content: &str, base: &DocumentMetadata) -> Vec<Chunk> {
        let command = base.command();
        let mut chunks = Vec::new();
        let mut current = Section::new(1, String::new());
        let mut in_code = false;
        let mut in_table = false;

        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim_start();

            if trimmed.starts_with("```") {
                in_code = !in_code;
                current.is_code = true;
                current.push(line);
                continue;
            }
            if in_code {
                current.push(line);
                continue;
            }

            if line.starts_with('|') {
                if !in_table {
                    in_table = true;
                    if current.table_columns.is_empty() {
                        current.table_columns = table_cells(line);
                    }
                }
                current.is_table = true;
                current.push(line);
                continue;
            }
            if in_table {
                if trimmed.is_empty() {
                    in_table = false;
                }
                current.push(line);
                continue;
            }

            if line.starts_with('#') {
                let topic = line.trim_start_matches('#').trim().to_owned();
                let finished = std::mem::replace(&mut current, Section::new(idx + 1, topic));
                self.emit(finished, base, &command, &mut chunks);
            }
            current.push(line);
        }

        self.emit(current, base, &command, &mut chunks);
        chunks
    }

    fn emit(
        &self,
        section: Section<'_>,
        base: &DocumentMetadata,
        command: &str,
        out: &mut Vec<Chunk>,
    ) {
        if section.lines.is_empty() || section.lines.len() < self.config.min_lines {
            return;
        }
        let end_line = section.start_line + section.lines.len() - 1;
        out.push(Chunk {
            content: section.lines.join("\n"),
            embedding: Vec::new(),
            metadata: ChunkMetadata {
                source: base.source.clone(),
                start_line: section.start_line,
                end_line,
                command: command.to_owned(),
                section_type: SectionType::from_topic(&section.topic),
                topic: section.topic,
                is_table: section.is_table,
                is_code: section.is_code,
                table_columns: section.table_columns,
            },
        });
    }
}

fn table_cells(row: &str) -> Vec<String> {
    row.split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chunk(content: &str) -> Vec<Chunk> {
        MarkdownChunker::default().process(content, &DocumentMetadata::new("docs/logs.md"))
    }

    #[test]
    fn splits_on_headings() {
        let doc = "# Usage\nkubectl logs POD\nmore\n\n# Examples\nkubectl logs web\nkubectl logs -f web\n";
        let chunks = chunk(doc);
        assert_eq!(chunks.len(), 2);

        let usage = &chunks[0].metadata;
        assert_eq!(usage.topic, "Usage");
        assert_eq!(usage.section_type, SectionType::Usage);
        assert_eq!((usage.start_line, usage.end_line), (1, 4));
        assert_eq!(usage.command, "logs");
        assert_eq!(usage.source, "docs/logs.md");

        let examples = &chunks[1].metadata;
        assert_eq!(examples.section_type, SectionType::Example);
        assert_eq!((examples.start_line, examples.end_line), (5, 7));
        assert_eq!(chunks[1].content, "# Examples\nkubectl logs web\nkubectl logs -f web");
        assert!(chunks.iter().all(|c| c.embedding.is_empty()));
    }

    #[test]
    fn pre_heading_text_is_overview() {
        let doc = "Print the logs\nfor a container\nin a pod\n## Flags\n-f\n-p\n";
        let chunks = chunk(doc);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata.topic, "");
        assert_eq!(chunks[0].metadata.section_type, SectionType::Overview);
        assert_eq!(chunks[1].metadata.topic, "Flags");
        assert_eq!(chunks[1].metadata.section_type, SectionType::Flags);
    }

    #[test]
    fn short_sections_are_dropped() {
        let doc = "# Title\n# Usage\nline a\nline b\n# Tail\nonly\n";
        let chunks = chunk(doc);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.topic, "Usage");
    }

    #[test]
    fn heading_inside_fence_is_not_a_boundary() {
        let doc = "# Examples\n```sh\n# tail the logs\nkubectl logs -f web\n```\nafter\n";
        let chunks = chunk(doc);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].metadata.is_code);
        assert_eq!(chunks[0].metadata.end_line, 6);
        assert!(chunks[0].content.contains("# tail the logs"));
    }

    #[test]
    fn unterminated_fence_swallows_rest() {
        let doc = "# Usage\n```\n# not a heading\n# nor this\n";
        let chunks = chunk(doc);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.end_line, 4);
    }

    #[test]
    fn table_records_columns() {
        let doc = "# Flags\n| Flag | Description |\n|------|-------------|\n| -f | follow |\n\n# Next\na\nb\n";
        let chunks = chunk(doc);
        assert_eq!(chunks.len(), 2);
        let flags = &chunks[0].metadata;
        assert!(flags.is_table);
        assert!(!flags.is_code);
        assert_eq!(flags.table_columns, vec!["Flag", "Description"]);
        assert!(!chunks[1].metadata.is_table);
    }

    #[test]
    fn heading_directly_after_table_is_content() {
        let doc = "# Flags\n| Flag |\n| -f |\n# Not a boundary\n\n# Boundary\nx\ny\n";
        let chunks = chunk(doc);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata.topic, "Flags");
        assert_eq!(chunks[0].metadata.end_line, 5);
        assert_eq!(chunks[1].metadata.topic, "Boundary");
    }

    #[test]
    fn indented_hash_line_is_content() {
        let doc = "# Usage\nrun it like so:\n\n    # set the namespace first\n    kubectl config set-context --current\n    kubectl logs web\n";
        let chunks = chunk(doc);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.topic, "Usage");
        assert_eq!((chunks[0].metadata.start_line, chunks[0].metadata.end_line), (1, 6));
    }

    #[test]
    fn indented_pipe_line_is_not_a_table() {
        let doc = "# Usage\nsee\n  | not a table | really |\n\n# Flags\n-f\n-p\n";
        let chunks = chunk(doc);
        assert_eq!(chunks.len(), 2);
        assert!(!chunks[0].metadata.is_table);
        assert!(chunks[0].metadata.table_columns.is_empty());
        assert_eq!(chunks[1].metadata.topic, "Flags");
    }

    #[test]
    fn indented_fence_still_toggles_code() {
        let doc = "# Examples\n  ```sh\n# tail\n  ```\nafter\n";
        let chunks = chunk(doc);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].metadata.is_code);
    }

    #[test]
    fn empty_document() {
        assert!(chunk("").is_empty());
    }

    #[test]
    fn min_lines_is_configurable() {
        let chunker = MarkdownChunker::new(ChunkerConfig { min_lines: 1 });
        let chunks = chunker.process("# A\n# B\n# C", &DocumentMetadata::new("x.md"));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].metadata.start_line, 3);
    }

    fn section() -> impl Strategy<Value = (String, usize)> {
        ("[A-Za-z ]{0,12}", 0usize..6)
    }

    proptest! {
        #[test]
        fn never_panics(content in "(#|\\||```|[a-z ]|\n){0,200}") {
            let chunks = chunk(&content);
            for c in &chunks {
                prop_assert!(c.metadata.start_line <= c.metadata.end_line);
                prop_assert!(c.line_count() >= 3);
            }
            for pair in chunks.windows(2) {
                prop_assert!(pair[0].metadata.end_line < pair[1].metadata.start_line);
            }
        }

        #[test]
        fn heading_sections_span_to_next_heading(sections in prop::collection::vec(section(), 1..8)) {
            let mut doc = String::new();
            let mut expected = Vec::new();
            let mut line = 1;
            for (i, (title, body)) in sections.iter().enumerate() {
                doc.push_str(&format!("# H{i} {title}\n"));
                for b in 0..*body {
                    doc.push_str(&format!("body {b}\n"));
                }
                let len = 1 + body;
                if len >= 3 {
                    expected.push((line, line + len - 1));
                }
                line += len;
            }

            let chunks = chunk(&doc);
            prop_assert!(chunks.len() <= sections.len() + 1);
            let spans: Vec<_> = chunks
                .iter()
                .map(|c| (c.metadata.start_line, c.metadata.end_line))
                .collect();
            prop_assert_eq!(spans, expected);
        }
    }
}
