use ollama_rs::Ollama;
use ollama_rs::generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest};

use crate::error::LlmError;
use crate::provider::EmbeddingProvider;

/// Embeddings through a local or remote Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: Ollama,
    model: String,
}

impl OllamaEmbedder {
    #[must_use]
    pub fn new(base_url: &str, model: String) -> Self {
        let (host, port) = parse_host_port(base_url);
        Self {
            client: Ollama::new(host, port),
            model,
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, input: EmbeddingsInput) -> Result<Vec<Vec<f32>>, LlmError> {
        let request = GenerateEmbeddingsRequest::new(self.model.clone(), input);
        let response = self
            .client
            .generate_embeddings(request)
            .await
            .map_err(|e| LlmError::Other(format!("Ollama embedding request failed: {e}")))?;
        Ok(response.embeddings)
    }
}

impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.request(EmbeddingsInput::from(text))
            .await?
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or(LlmError::EmptyResponse { provider: "ollama" })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, LlmError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let input = EmbeddingsInput::Multiple(texts.iter().map(|t| (*t).to_owned()).collect());
        let vectors = self.request(input).await?;
        if vectors.len() != texts.len() {
            return Err(LlmError::BatchMismatch {
                provider: "ollama",
                expected: texts.len(),
                actual: vectors.len(),
            });
        }
        Ok(vectors)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "ollama"
    }
}

fn parse_host_port(url: &str) -> (String, u16) {
    let url = url.trim_end_matches('/');
    if let Some(colon_pos) = url.rfind(':') {
        let port_str = &url[colon_pos + 1..];
        if let Ok(port) = port_str.parse::<u16>() {
            let host = url[..colon_pos].to_string();
            return (host, port);
        }
    }
    (url.to_string(), 11434)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stores_model() {
        let embedder = OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text".into());
        assert_eq!(embedder.model(), "nomic-embed-text");
        assert_eq!(embedder.name(), "ollama");
    }

    #[test]
    fn parse_host_port_default_port() {
        assert_eq!(
            parse_host_port("http://localhost"),
            ("http://localhost".to_owned(), 11434)
        );
    }

    #[test]
    fn parse_host_port_custom_port() {
        assert_eq!(
            parse_host_port("http://10.0.0.5:8080"),
            ("http://10.0.0.5".to_owned(), 8080)
        );
    }

    #[test]
    fn parse_host_port_trailing_slashes() {
        assert_eq!(
            parse_host_port("http://localhost:11434//"),
            ("http://localhost".to_owned(), 11434)
        );
    }

    #[test]
    fn parse_host_port_invalid_port_falls_back() {
        assert_eq!(
            parse_host_port("http://localhost:99999"),
            ("http://localhost:99999".to_owned(), 11434)
        );
    }

    #[tokio::test]
    async fn empty_batch_skips_request() {
        let embedder = OllamaEmbedder::new("http://127.0.0.1:1", "m".into());
        let vectors = embedder.embed_batch(&[]).await.unwrap();
        assert!(vectors.is_empty());
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        let embedder = OllamaEmbedder::new("http://127.0.0.1:1", "m".into());
        assert!(embedder.embed("hello").await.is_err());
    }
}
