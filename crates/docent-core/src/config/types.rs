use std::fmt;

use serde::{Deserialize, Serialize};

/// Embedding backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Ollama,
    OpenAi,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
        }
    }
}

/// String wrapper that never prints its contents.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub learning: LearningConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Retries on HTTP 429 for remote providers.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: default_base_url(),
            embedding_model: default_embedding_model(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".into()
}

fn default_max_retries() -> u32 {
    3
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IndexConfig {
    #[serde(default = "default_store_path")]
    pub store_path: String,
    /// Sections shorter than this are not indexed.
    #[serde(default = "default_min_lines")]
    pub min_lines: usize,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            min_lines: default_min_lines(),
            search_limit: default_search_limit(),
        }
    }
}

fn default_store_path() -> String {
    "./data/chunks.json".into()
}

fn default_min_lines() -> usize {
    3
}

fn default_search_limit() -> usize {
    5
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LearningConfig {
    #[serde(default = "default_learning_path")]
    pub path: String,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            path: default_learning_path(),
        }
    }
}

fn default_learning_path() -> String {
    "./data/learning.json".into()
}

/// Secrets resolved from the environment, never read from or written to TOML.
#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    pub openai_api_key: Option<Secret>,
}
