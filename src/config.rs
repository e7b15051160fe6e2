//! Server configuration.
//!
//! Settings come from an optional TOML file, then environment variables
//! (including a `.env` file loaded at startup), then CLI flags.

use crate::dictionary::FallbackDictionary;
use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Configuration for the shiritori server and terminal game.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Directory with the browser front end, served at `/static`.
    #[serde(default = "default_static_dir")]
    static_dir: Option<PathBuf>,

    /// TOML dictionary replacing the built-in fallback words.
    #[serde(default)]
    dictionary: Option<PathBuf>,

    /// LLM provider (openai, anthropic or gemini).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name.
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// How long to wait for the model before falling back, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    llm_timeout_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> Option<PathBuf> {
    Some(PathBuf::from("static"))
}

fn default_provider() -> LlmProvider {
    LlmProvider::Gemini
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_max_tokens() -> u32 {
    32
}

fn default_timeout_ms() -> u64 {
    8_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            dictionary: None,
            llm_provider: default_provider(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            llm_timeout_ms: default_timeout_ms(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ConfigError::new(format!("Failed to parse config: {}", e))
        })?;

        info!(
            provider = ?config.llm_provider,
            model = %config.llm_model,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads the file at `path` if it exists, then applies environment overrides.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`.
    ///
    /// Recognized keys: `SHIRITORI_HOST`, `SHIRITORI_PORT`,
    /// `SHIRITORI_STATIC_DIR`, `SHIRITORI_DICTIONARY`, `LLM_PROVIDER`,
    /// `LLM_MODEL` (or `GEMINI_MODEL`), `LLM_TIMEOUT_MS`.
    #[instrument(skip(self, lookup))]
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("SHIRITORI_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("SHIRITORI_PORT") {
            self.port = parse_var("SHIRITORI_PORT", &port)?;
        }
        if let Some(dir) = lookup("SHIRITORI_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = lookup("SHIRITORI_DICTIONARY") {
            self.dictionary = Some(PathBuf::from(path));
        }
        if let Some(provider) = lookup("LLM_PROVIDER") {
            self.llm_provider = parse_var("LLM_PROVIDER", &provider)?;
        }
        if let Some(model) = lookup("LLM_MODEL").or_else(|| lookup("GEMINI_MODEL")) {
            self.llm_model = model;
        }
        if let Some(timeout) = lookup("LLM_TIMEOUT_MS") {
            self.llm_timeout_ms = parse_var("LLM_TIMEOUT_MS", &timeout)?;
        }
        Ok(self)
    }

    /// Overrides the bind address.
    pub fn with_address(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Model timeout as a [`Duration`].
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm_timeout_ms)
    }

    /// Creates LLM configuration from this config.
    /// Requires OPENAI_API_KEY, ANTHROPIC_API_KEY or GEMINI_API_KEY,
    /// depending on the provider.
    #[instrument(skip(self), fields(provider = ?self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");

        let key_var = self.llm_provider.api_key_var();
        let api_key = std::env::var(key_var).map_err(|_| {
            ConfigError::new(format!("{} environment variable not set", key_var))
        })?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        ))
    }

    /// Loads the configured dictionary, or the built-in one.
    #[instrument(skip(self))]
    pub fn load_dictionary(&self) -> Result<FallbackDictionary, ConfigError> {
        match &self.dictionary {
            Some(path) => FallbackDictionary::from_file(path),
            None => {
                debug!("Using built-in dictionary");
                Ok(FallbackDictionary::builtin())
            }
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| {
        warn!(key, value, "Invalid environment override");
        ConfigError::new(format!("Invalid value for {}: {}", key, value))
    })
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
