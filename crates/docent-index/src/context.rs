//! Rendering ranked chunks for inclusion in an LLM prompt.

use std::fmt::Write;

use crate::types::ScoredChunk;

/// Format ranked chunks as a `<documentation>` block.
///
/// Returns an empty string when there are no chunks.
#[must_use]
pub fn format_as_context(chunks: &[ScoredChunk]) -> String {
    if chunks.is_empty() {
        return String::new();
    }

    let mut out = String::from("<documentation>\n");

    for hit in chunks {
        let meta = &hit.chunk.metadata;
        let _ = writeln!(
            out,
            "  <chunk source=\"{}\" lines=\"{}-{}\" command=\"{}\" topic=\"{}\" type=\"{}\" score=\"{:.2}\">",
            meta.source,
            meta.start_line,
            meta.end_line,
            meta.command,
            escape_attr(&meta.topic),
            meta.section_type,
            hit.score,
        );
        out.push_str(&hit.chunk.content);
        out.push_str("\n  </chunk>\n");
    }

    out.push_str("</documentation>");
    out
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}
