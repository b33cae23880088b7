use std::io::Write;

use serial_test::serial;

use super::*;

const ENV_KEYS: [&str; 8] = [
    "DOCENT_LLM_PROVIDER",
    "DOCENT_LLM_BASE_URL",
    "DOCENT_LLM_EMBEDDING_MODEL",
    "DOCENT_OPENAI_API_KEY",
    "DOCENT_INDEX_STORE_PATH",
    "DOCENT_INDEX_MIN_LINES",
    "DOCENT_INDEX_SEARCH_LIMIT",
    "DOCENT_LEARNING_PATH",
];

fn clear_env() {
    for key in ENV_KEYS {
        unsafe { std::env::remove_var(key) };
    }
}

fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("docent.toml");
    let mut f = std::fs::File::create(&path).unwrap();
    write!(f, "{content}").unwrap();
    path
}

#[test]
fn defaults() {
    let config = Config::default();
    assert_eq!(config.llm.provider, ProviderKind::Ollama);
    assert_eq!(config.llm.base_url, "http://localhost:11434");
    assert_eq!(config.llm.embedding_model, "nomic-embed-text");
    assert_eq!(config.llm.max_retries, 3);
    assert_eq!(config.index.store_path, "./data/chunks.json");
    assert_eq!(config.index.min_lines, 3);
    assert_eq!(config.index.search_limit, 5);
    assert_eq!(config.learning.path, "./data/learning.json");
    assert!(config.secrets.openai_api_key.is_none());
}

#[test]
#[serial]
fn defaults_when_file_missing() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.index.search_limit, 5);
    config.validate().unwrap();
}

#[test]
#[serial]
fn parse_valid_toml() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
[llm]
provider = "openai"
base_url = "https://api.openai.com/v1"
embedding_model = "text-embedding-3-small"

[index]
store_path = "/var/lib/docent/chunks.json"
min_lines = 2

[learning]
path = "/var/lib/docent/learning.json"
"#,
    );

    let config = Config::load(&path).unwrap();
    assert_eq!(config.llm.provider, ProviderKind::OpenAi);
    assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
    assert_eq!(config.llm.embedding_model, "text-embedding-3-small");
    assert_eq!(config.llm.max_retries, 3);
    assert_eq!(config.index.store_path, "/var/lib/docent/chunks.json");
    assert_eq!(config.index.min_lines, 2);
    assert_eq!(config.index.search_limit, 5);
    assert_eq!(config.learning.path, "/var/lib/docent/learning.json");
}

#[test]
#[serial]
fn invalid_toml_is_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[index\nmin_lines = ");
    let err = Config::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse config file"));
}

#[test]
#[serial]
fn env_overrides_file_values() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[index]\nsearch_limit = 8\n");

    unsafe {
        std::env::set_var("DOCENT_LLM_PROVIDER", "OpenAI");
        std::env::set_var("DOCENT_LLM_BASE_URL", "http://gateway:8080/v1");
        std::env::set_var("DOCENT_LLM_EMBEDDING_MODEL", "bge-m3");
        std::env::set_var("DOCENT_OPENAI_API_KEY", "sk-test");
        std::env::set_var("DOCENT_INDEX_STORE_PATH", "/tmp/chunks.json");
        std::env::set_var("DOCENT_INDEX_MIN_LINES", "4");
        std::env::set_var("DOCENT_INDEX_SEARCH_LIMIT", "10");
        std::env::set_var("DOCENT_LEARNING_PATH", "/tmp/learning.json");
    }

    let config = Config::load(&path).unwrap();
    clear_env();

    assert_eq!(config.llm.provider, ProviderKind::OpenAi);
    assert_eq!(config.llm.base_url, "http://gateway:8080/v1");
    assert_eq!(config.llm.embedding_model, "bge-m3");
    assert_eq!(
        config.secrets.openai_api_key.as_ref().map(Secret::expose),
        Some("sk-test")
    );
    assert_eq!(config.index.store_path, "/tmp/chunks.json");
    assert_eq!(config.index.min_lines, 4);
    assert_eq!(config.index.search_limit, 10);
    assert_eq!(config.learning.path, "/tmp/learning.json");
    config.validate().unwrap();
}

#[test]
#[serial]
fn invalid_env_values_are_ignored() {
    clear_env();
    unsafe {
        std::env::set_var("DOCENT_LLM_PROVIDER", "claude");
        std::env::set_var("DOCENT_INDEX_MIN_LINES", "many");
        std::env::set_var("DOCENT_INDEX_SEARCH_LIMIT", "-1");
    }

    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.toml")).unwrap();
    clear_env();

    assert_eq!(config.llm.provider, ProviderKind::Ollama);
    assert_eq!(config.index.min_lines, 3);
    assert_eq!(config.index.search_limit, 5);
}

#[test]
fn validate_rejects_zero_limits() {
    let mut config = Config::default();
    config.index.min_lines = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.index.search_limit = 0;
    assert!(config.validate().is_err());
}

#[test]
fn validate_requires_openai_key() {
    let mut config = Config::default();
    config.llm.provider = ProviderKind::OpenAi;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("DOCENT_OPENAI_API_KEY"));

    config.secrets.openai_api_key = Some(Secret::new("sk-test"));
    config.validate().unwrap();
}

#[test]
fn secret_debug_is_redacted() {
    let secret = Secret::new("sk-live");
    assert_eq!(format!("{secret:?}"), "[REDACTED]");
}
