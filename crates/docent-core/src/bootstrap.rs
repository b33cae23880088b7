//! Construction of the embedder and stores from a validated [`Config`].

use std::path::{Path, PathBuf};

use anyhow::Context;
use docent_index::{ChunkStore, ChunkerConfig, MarkdownChunker};
use docent_llm::AnyEmbedder;
use docent_llm::ollama::OllamaEmbedder;
use docent_llm::openai::OpenAiEmbedder;
use docent_memory::LearningStore;

use crate::config::{Config, ProviderKind};

/// Priority: CLI `--config` > `DOCENT_CONFIG` env > `config/default.toml`.
#[must_use]
pub fn resolve_config_path(cli: Option<&Path>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("DOCENT_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

/// Build the embedding backend selected by `config.llm.provider`.
///
/// # Errors
///
/// Returns an error if the `OpenAI` provider is selected without an API key.
pub fn create_embedder(config: &Config) -> anyhow::Result<AnyEmbedder> {
    let embedder = match config.llm.provider {
        ProviderKind::Ollama => AnyEmbedder::Ollama(OllamaEmbedder::new(
            &config.llm.base_url,
            config.llm.embedding_model.clone(),
        )),
        ProviderKind::OpenAi => {
            let api_key = config
                .secrets
                .openai_api_key
                .as_ref()
                .context("DOCENT_OPENAI_API_KEY not found")?;
            AnyEmbedder::OpenAi(
                OpenAiEmbedder::new(
                    api_key.expose().to_owned(),
                    config.llm.base_url.clone(),
                    config.llm.embedding_model.clone(),
                )
                .with_max_retries(config.llm.max_retries),
            )
        }
    };
    tracing::info!(
        provider = config.llm.provider.as_str(),
        model = %config.llm.embedding_model,
        "embedder ready"
    );
    Ok(embedder)
}

#[must_use]
pub fn create_chunker(config: &Config) -> MarkdownChunker {
    MarkdownChunker::new(ChunkerConfig {
        min_lines: config.index.min_lines,
    })
}

/// Create the chunk store and load it from `index.store_path`.
///
/// # Errors
///
/// Returns an error if an existing store file cannot be read or parsed.
pub fn open_chunk_store<P: docent_llm::EmbeddingProvider>(
    config: &Config,
    embedder: P,
) -> anyhow::Result<ChunkStore<P>> {
    let store = ChunkStore::new(embedder);
    store
        .load(Path::new(&config.index.store_path))
        .with_context(|| format!("failed to load chunk store {}", config.index.store_path))?;
    Ok(store)
}

/// Open the learning store at `learning.path`.
///
/// # Errors
///
/// Returns an error if an existing learning file cannot be read or parsed.
pub fn open_learning_store(config: &Config) -> anyhow::Result<LearningStore> {
    LearningStore::open(&config.learning.path)
        .with_context(|| format!("failed to open learning store {}", config.learning.path))
}
