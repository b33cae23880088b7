#[cfg(feature = "mock")]
use crate::mock::MockEmbedder;
use crate::ollama::OllamaEmbedder;
use crate::openai::OpenAiEmbedder;
use crate::provider::EmbeddingProvider;

/// Generates a match over all `AnyEmbedder` variants, binding the inner embedder
/// and evaluating the given expression for each arm.
macro_rules! delegate_embedder {
    ($self:expr, |$p:ident| $expr:expr) => {
        match $self {
            AnyEmbedder::Ollama($p) => $expr,
            AnyEmbedder::OpenAi($p) => $expr,
            #[cfg(feature = "mock")]
            AnyEmbedder::Mock($p) => $expr,
        }
    };
}

#[derive(Debug, Clone)]
pub enum AnyEmbedder {
    Ollama(OllamaEmbedder),
    OpenAi(OpenAiEmbedder),
    #[cfg(feature = "mock")]
    Mock(MockEmbedder),
}

impl EmbeddingProvider for AnyEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, crate::LlmError> {
        delegate_embedder!(self, |p| p.embed(text).await)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, crate::LlmError> {
        delegate_embedder!(self, |p| p.embed_batch(texts).await)
    }

    fn name(&self) -> &str {
        delegate_embedder!(self, |p| p.name())
    }
}

impl From<OllamaEmbedder> for AnyEmbedder {
    fn from(p: OllamaEmbedder) -> Self {
        Self::Ollama(p)
    }
}

impl From<OpenAiEmbedder> for AnyEmbedder {
    fn from(p: OpenAiEmbedder) -> Self {
        Self::OpenAi(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_delegates() {
        let ollama: AnyEmbedder = OllamaEmbedder::new("http://localhost:11434", "m".into()).into();
        assert_eq!(ollama.name(), "ollama");

        let openai: AnyEmbedder =
            OpenAiEmbedder::new("k".into(), "https://api.openai.com/v1".into(), "m".into()).into();
        assert_eq!(openai.name(), "openai");
    }

    #[cfg(feature = "mock")]
    #[tokio::test]
    async fn embed_delegates_to_mock() {
        let any = AnyEmbedder::Mock(MockEmbedder::with_default(vec![0.1, 0.2]));
        assert_eq!(any.embed("x").await.unwrap(), vec![0.1, 0.2]);
        assert_eq!(any.embed_batch(&["a", "b"]).await.unwrap().len(), 2);
    }
}
