//! Test-only mock embedding provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::LlmError;
use crate::provider::EmbeddingProvider;

/// Deterministic embedder: exact-text lookups first, then substring rules in
/// insertion order, then the default vector.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    exact: HashMap<String, Vec<f32>>,
    rules: Vec<(String, Vec<f32>)>,
    pub default_embedding: Vec<f32>,
    /// Fail any text containing this substring.
    pub fail_on: Option<String>,
    pub fail_all: bool,
    calls: Arc<AtomicUsize>,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self {
            exact: HashMap::new(),
            rules: Vec::new(),
            default_embedding: vec![1.0, 0.0, 0.0],
            fail_on: None,
            fail_all: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockEmbedder {
    #[must_use]
    pub fn with_default(embedding: Vec<f32>) -> Self {
        Self {
            default_embedding: embedding,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        self.exact.insert(text.into(), embedding);
        self
    }

    #[must_use]
    pub fn with_rule(mut self, needle: impl Into<String>, embedding: Vec<f32>) -> Self {
        self.rules.push((needle.into(), embedding));
        self
    }

    #[must_use]
    pub fn fail_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    /// Number of `embed` calls served so far, including failed ones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_all {
            return Err(LlmError::Other("mock embedding error".into()));
        }
        if let Some(needle) = &self.fail_on
            && text.contains(needle.as_str())
        {
            return Err(LlmError::Other(format!("mock embedding error on '{needle}'")));
        }
        if let Some(v) = self.exact.get(text) {
            return Ok(v.clone());
        }
        Ok(self
            .rules
            .iter()
            .find(|(needle, _)| text.contains(needle.as_str()))
            .map_or_else(|| self.default_embedding.clone(), |(_, v)| v.clone()))
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}
