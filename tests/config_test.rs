//! Tests for configuration loading.

use shiritori::{LlmProvider, ServerConfig};
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = ServerConfig::default();
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(*config.port(), 8000);
    assert_eq!(*config.llm_provider(), LlmProvider::Gemini);
    assert_eq!(config.llm_timeout(), Duration::from_millis(8_000));
    assert!(config.dictionary().is_none());
}

#[test]
fn test_from_toml_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
port = 9000
llm_provider = "anthropic"
llm_model = "claude-3-5-haiku-20241022"
llm_timeout_ms = 2500
"#
    )
    .expect("write config");

    let config = ServerConfig::from_file(file.path()).expect("config loads");
    assert_eq!(*config.port(), 9000);
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(*config.llm_provider(), LlmProvider::Anthropic);
    assert_eq!(config.llm_model(), "claude-3-5-haiku-20241022");
    assert_eq!(config.llm_timeout(), Duration::from_millis(2_500));
}

#[test]
fn test_malformed_toml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "port = \"not a number\"").expect("write config");
    assert!(ServerConfig::from_file(file.path()).is_err());
}

#[test]
fn test_env_overrides() {
    let config = ServerConfig::default()
        .with_env_overrides(lookup(&[
            ("SHIRITORI_HOST", "0.0.0.0"),
            ("SHIRITORI_PORT", "8080"),
            ("LLM_PROVIDER", "OpenAI"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("LLM_TIMEOUT_MS", "100"),
        ]))
        .expect("overrides apply");

    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.port(), 8080);
    assert_eq!(*config.llm_provider(), LlmProvider::OpenAI);
    assert_eq!(config.llm_model(), "gemini-2.0-flash");
    assert_eq!(config.llm_timeout(), Duration::from_millis(100));
}

#[test]
fn test_llm_model_wins_over_gemini_model() {
    let config = ServerConfig::default()
        .with_env_overrides(lookup(&[
            ("LLM_MODEL", "gpt-4o-mini"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
        ]))
        .expect("overrides apply");
    assert_eq!(config.llm_model(), "gpt-4o-mini");
}

#[test]
fn test_invalid_override_is_an_error() {
    let result =
        ServerConfig::default().with_env_overrides(lookup(&[("SHIRITORI_PORT", "eighty")]));
    assert!(result.is_err());

    let result =
        ServerConfig::default().with_env_overrides(lookup(&[("LLM_PROVIDER", "mystery")]));
    assert!(result.is_err());
}

#[test]
fn test_cli_address_overrides_config() {
    let config = ServerConfig::default().with_address(Some("localhost".to_string()), None);
    assert_eq!(config.host(), "localhost");
    assert_eq!(*config.port(), 8000);
}

#[test]
fn test_configured_dictionary_is_loaded() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("words.toml");
    std::fs::write(&path, "[words]\n\"ね\" = [\"ねこ\"]\n").expect("write dictionary");

    let config = ServerConfig::default()
        .with_env_overrides(lookup(&[(
            "SHIRITORI_DICTIONARY",
            path.to_str().expect("utf-8 path"),
        )]))
        .expect("overrides apply");

    let dict = config.load_dictionary().expect("dictionary loads");
    assert_eq!(dict.len(), 1);
}
