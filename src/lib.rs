//! Shiritori library - a hiragana word-chain referee with an AI opponent
//!
//! The engine is stateless: every turn is adjudicated from the history the
//! client sends, so any number of games can run concurrently without
//! session storage.
//!
//! # Architecture
//!
//! - **Kana**: head/tail normalization (small kana, long-vowel mark)
//! - **Rules**: move legality, shared by both players
//! - **Dictionary**: deterministic fallback words
//! - **Mover**: LLM move generation with timeout and dictionary fallback
//! - **Engine**: the per-turn state machine
//! - **Server**: JSON API over HTTP
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use shiritori::{DictionaryMover, FallbackDictionary, FallbackMover, ModelMover, TurnEngine};
//! use shiritori::LlmClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let dictionary = Arc::new(FallbackDictionary::builtin());
//! let mover: FallbackMover<ModelMover<LlmClient>, _> =
//!     FallbackMover::fallback_only(DictionaryMover::new(dictionary));
//! let engine = TurnEngine::new(mover);
//!
//! let result = engine.process_turn(&Vec::<String>::new(), "あめ").await?;
//! println!("{}", result.message());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod dictionary;
mod engine;
mod history;
pub mod kana;
pub mod llm_client;
mod mover;
mod play;
mod rules;
mod server;
mod word;

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Game rules
pub use history::{History, HistoryError, MAX_TURNS, MAX_WORDS};
pub use rules::{
    AvoidsForbiddenTail, HiraganaOnly, LegalWord, NotYetUsed, RuleViolation, StartsWithHead,
    validate,
};
pub use word::Word;

// Crate-level exports - AI moves
pub use dictionary::FallbackDictionary;
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};
pub use mover::{
    AiMove, DictionaryMover, FallbackMover, GenerationRequest, ModelMover, MoveProvider,
    MoveSource, Mover, MoverError, WordGenerator, parse_reply,
};

// Crate-level exports - Turn engine
pub use engine::{ShiritoriEngine, TurnEngine, TurnOutcome, TurnResult, Winner, build_engine};

// Crate-level exports - HTTP and terminal front ends
pub use play::{play_session, run_play};
pub use server::{ApiError, MoveRequest, MoveResponse, create_router, serve};
