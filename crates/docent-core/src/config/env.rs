use super::{Config, Secret};

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DOCENT_LLM_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.to_lowercase())) {
                self.llm.provider = kind;
            } else {
                tracing::warn!("ignoring invalid DOCENT_LLM_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("DOCENT_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("DOCENT_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Ok(v) = std::env::var("DOCENT_OPENAI_API_KEY")
            && !v.is_empty()
        {
            self.secrets.openai_api_key = Some(Secret::new(v));
        }
        if let Ok(v) = std::env::var("DOCENT_INDEX_STORE_PATH") {
            self.index.store_path = v;
        }
        if let Ok(v) = std::env::var("DOCENT_INDEX_MIN_LINES") {
            match v.parse::<usize>() {
                Ok(n) => self.index.min_lines = n,
                Err(_) => tracing::warn!("ignoring invalid DOCENT_INDEX_MIN_LINES value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("DOCENT_INDEX_SEARCH_LIMIT") {
            match v.parse::<usize>() {
                Ok(n) => self.index.search_limit = n,
                Err(_) => tracing::warn!("ignoring invalid DOCENT_INDEX_SEARCH_LIMIT value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("DOCENT_LEARNING_PATH") {
            self.learning.path = v;
        }
    }
}
