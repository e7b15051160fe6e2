//! Integration test for LLM client connectivity.

use shiritori::llm_client::{LlmClient, LlmConfig, LlmProvider};
use shiritori::{GenerationRequest, History, WordGenerator, parse_reply};
use tracing::instrument;

fn client_for(provider: LlmProvider, model: &str) -> LlmClient {
    dotenvy::dotenv().ok();

    let key_var = provider.api_key_var();
    let api_key = std::env::var(key_var).unwrap_or_else(|_| panic!("{} not set", key_var));

    LlmClient::new(LlmConfig::new(provider, api_key, model.to_string(), 32))
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_gemini_connectivity() {
    let client = client_for(LlmProvider::Gemini, "gemini-1.5-flash");

    let response = client
        .generate("You are a helpful assistant.", "Say 'Hello, world!' and nothing else.")
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_anthropic_connectivity() {
    let client = client_for(LlmProvider::Anthropic, "claude-3-5-haiku-20241022");

    let response = client
        .generate("You are a helpful assistant.", "Say 'Hello, world!' and nothing else.")
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_openai_connectivity() {
    let client = client_for(LlmProvider::OpenAI, "gpt-4o-mini");

    let response = client
        .generate("You are a helpful assistant.", "Say 'Hello, world!' and nothing else.")
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_gemini_answers_in_hiragana() {
    let client = client_for(LlmProvider::Gemini, "gemini-1.5-flash");
    let history = History::from_client(&["しりとり"]).expect("valid history");

    let reply = client
        .generate_word(&GenerationRequest::new('り', &history))
        .await
        .expect("Failed to generate");

    eprintln!("Reply: {}", reply);
    assert!(parse_reply(&reply).is_some(), "Reply should contain a word");
}
