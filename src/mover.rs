//! AI move generation with deterministic fallback.
//!
//! A [`Mover`] produces a candidate word for a required head. Two exist:
//! [`ModelMover`] asks a [`WordGenerator`] (normally the LLM) under a
//! timeout, and [`DictionaryMover`] draws from the [`FallbackDictionary`].
//! [`FallbackMover`] composes them: every candidate is validated with
//! [`rules::validate`], the same check a user word goes through, and a
//! failed or illegal model answer falls through to the dictionary.

use crate::dictionary::FallbackDictionary;
use crate::history::History;
use crate::kana::{self, FORBIDDEN_TAIL};
use crate::llm_client::{LlmClient, LlmError};
use crate::rules;
use crate::word::Word;
use async_trait::async_trait;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Characters stripped from both ends of a model reply.
const REPLY_PUNCTUATION: &[char] = &[
    '「', '」', '『', '』', '"', '\'', '。', '、', '.', ',', '!', '！', '?', '？', '*', '`',
];

/// What the generative collaborator is asked for.
#[derive(Debug, Clone, Copy, new)]
pub struct GenerationRequest<'a> {
    /// Head the word must start with.
    pub required_head: char,
    /// Words already played, in order. None of them may be reused.
    pub history: &'a History,
}

impl GenerationRequest<'_> {
    /// The word the AI is answering.
    pub fn last_word(&self) -> Option<&Word> {
        self.history.last()
    }
}

/// Opaque capability that may come up with a word for a request.
#[async_trait]
pub trait WordGenerator: Send + Sync {
    /// Returns the raw reply; parsing and validation happen downstream.
    async fn generate_word(&self, request: &GenerationRequest<'_>) -> Result<String, LlmError>;
}

#[async_trait]
impl WordGenerator for LlmClient {
    #[instrument(skip(self, request), fields(required_head = %request.required_head))]
    async fn generate_word(&self, request: &GenerationRequest<'_>) -> Result<String, LlmError> {
        let system_prompt = system_prompt(request.required_head);
        let user_message = user_message(request);
        self.generate(&system_prompt, &user_message).await
    }
}

fn system_prompt(required_head: char) -> String {
    format!(
        "あなたは日本語のしりとりの相手です。つぎのルールをまもってください。\n\
         - ひらがなの名詞を1語だけ出力する。説明や記号は書かない\n\
         - 『{head}』ではじまることばにする\n\
         - すでに出たことばは使わない\n\
         - 『{forbidden}』で終わることばは使わない\n\
         - 小さい文字や「ー」で終わるときは、しりとりの読みで次の文字を考える",
        head = required_head,
        forbidden = FORBIDDEN_TAIL,
    )
}

fn user_message(request: &GenerationRequest<'_>) -> String {
    let used = if request.history.is_empty() {
        "なし".to_string()
    } else {
        request.history.to_strings().join("、")
    };
    let last = request
        .last_word()
        .map(Word::as_str)
        .unwrap_or("なし");
    format!(
        "これまでのことば: {used}\n\
         さいごのことば: {last}\n\
         『{head}』ではじまることばを1語だけ、ひらがなで書いてね。",
        head = request.required_head,
    )
}

/// Extracts a candidate word from a model reply.
///
/// Takes the first whitespace-separated token, strips quotes and
/// punctuation, and cleans it like player input. Returns `None` if nothing
/// is left.
#[instrument]
pub fn parse_reply(reply: &str) -> Option<String> {
    let token = reply.split_whitespace().next()?;
    let cleaned = kana::clean_input(token.trim_matches(REPLY_PUNCTUATION));
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Where an accepted AI word came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MoveSource {
    /// The generative model.
    Model,
    /// The fallback dictionary.
    Fallback,
}

/// Result of asking the AI for a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiMove {
    /// The model's word, validated.
    Model(Word),
    /// A dictionary word, validated.
    Fallback(Word),
    /// Neither source produced a legal word.
    Exhausted,
}

impl AiMove {
    /// The accepted word, if any.
    pub fn word(&self) -> Option<&Word> {
        match self {
            AiMove::Model(word) | AiMove::Fallback(word) => Some(word),
            AiMove::Exhausted => None,
        }
    }

    /// Where the word came from, if any.
    pub fn source(&self) -> Option<MoveSource> {
        match self {
            AiMove::Model(_) => Some(MoveSource::Model),
            AiMove::Fallback(_) => Some(MoveSource::Fallback),
            AiMove::Exhausted => None,
        }
    }
}

/// Why a mover produced no candidate.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoverError {
    /// The collaborator call failed.
    #[display("Collaborator unavailable: {}", _0)]
    Unavailable(#[error(not(source))] String),

    /// The collaborator did not answer in time.
    #[display("Collaborator timed out after {:?}", _0)]
    TimedOut(#[error(not(source))] Duration),

    /// The reply contained no usable word.
    #[display("Could not parse a word from {:?}", _0)]
    Unparseable(#[error(not(source))] String),

    /// No dictionary word left for the head.
    #[display("No fallback word left for '{}'", _0)]
    Exhausted(#[error(not(source))] char),
}

/// A source of candidate AI words.
#[async_trait]
pub trait Mover: Send + Sync {
    /// Proposes a candidate. Candidates are not yet validated.
    async fn candidate(&self, history: &History, required_head: char)
    -> Result<String, MoverError>;
}

/// Asks a [`WordGenerator`] for a word, bounded by a timeout.
#[derive(Debug, Clone)]
pub struct ModelMover<G> {
    generator: G,
    timeout: Duration,
}

impl<G: WordGenerator> ModelMover<G> {
    /// Creates a model mover.
    pub fn new(generator: G, timeout: Duration) -> Self {
        Self { generator, timeout }
    }
}

#[async_trait]
impl<G: WordGenerator> Mover for ModelMover<G> {
    #[instrument(skip(self, history), fields(required_head = %required_head, timeout = ?self.timeout))]
    async fn candidate(
        &self,
        history: &History,
        required_head: char,
    ) -> Result<String, MoverError> {
        let request = GenerationRequest::new(required_head, history);
        let reply = tokio::time::timeout(self.timeout, self.generator.generate_word(&request))
            .await
            .map_err(|_| MoverError::TimedOut(self.timeout))?
            .map_err(|e| MoverError::Unavailable(e.message))?;

        debug!(reply = %reply, "Model replied");
        parse_reply(&reply).ok_or(MoverError::Unparseable(reply))
    }
}

/// Draws the first unused word from the fallback dictionary.
#[derive(Debug, Clone)]
pub struct DictionaryMover {
    dictionary: Arc<FallbackDictionary>,
}

impl DictionaryMover {
    /// Creates a dictionary mover.
    pub fn new(dictionary: Arc<FallbackDictionary>) -> Self {
        Self { dictionary }
    }
}

#[async_trait]
impl Mover for DictionaryMover {
    #[instrument(skip(self, history), fields(required_head = %required_head))]
    async fn candidate(
        &self,
        history: &History,
        required_head: char,
    ) -> Result<String, MoverError> {
        self.dictionary
            .pick(required_head, history.used())
            .map(Word::into_string)
            .ok_or(MoverError::Exhausted(required_head))
    }
}

/// Produces the AI's move for the turn engine.
#[async_trait]
pub trait MoveProvider: Send + Sync {
    /// Proposes a validated move starting with `required_head`.
    async fn propose_move(&self, history: &History, required_head: char) -> AiMove;
}

/// Tries an optional primary mover, then the fallback.
///
/// Candidates from both are validated under the user rules. A candidate
/// ending in `ん` is treated as invalid here rather than as a losing move,
/// so the AI never plays a self-defeating word.
#[derive(Debug, Clone)]
pub struct FallbackMover<P, F> {
    primary: Option<P>,
    fallback: F,
}

impl<P: Mover, F: Mover> FallbackMover<P, F> {
    /// Composes a primary mover with a fallback.
    pub fn new(primary: P, fallback: F) -> Self {
        Self {
            primary: Some(primary),
            fallback,
        }
    }

    /// Uses the fallback alone.
    pub fn fallback_only(fallback: F) -> Self {
        Self {
            primary: None,
            fallback,
        }
    }

    /// True if a primary mover is configured.
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    async fn validated<M: Mover>(
        mover: &M,
        history: &History,
        required_head: char,
        stage: MoveSource,
    ) -> Option<Word> {
        let candidate = match mover.candidate(history, required_head).await {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!(%stage, error = %e, "No candidate");
                return None;
            }
        };
        match rules::validate(history, &candidate, Some(required_head)) {
            Ok(word) => Some(word),
            Err(violation) => {
                warn!(%stage, candidate = %candidate, %violation, "Candidate rejected");
                None
            }
        }
    }
}

#[async_trait]
impl<P: Mover, F: Mover> MoveProvider for FallbackMover<P, F> {
    #[instrument(skip(self, history), fields(required_head = %required_head, history_len = history.len()))]
    async fn propose_move(&self, history: &History, required_head: char) -> AiMove {
        if let Some(primary) = &self.primary {
            if let Some(word) =
                Self::validated(primary, history, required_head, MoveSource::Model).await
            {
                info!(word = %word, "Model move accepted");
                return AiMove::Model(word);
            }
        }

        match Self::validated(&self.fallback, history, required_head, MoveSource::Fallback).await {
            Some(word) => {
                info!(word = %word, "Fallback move accepted");
                AiMove::Fallback(word)
            }
            None => {
                warn!("AI has no legal move");
                AiMove::Exhausted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_takes_first_token() {
        assert_eq!(parse_reply("めがね です"), Some("めがね".to_string()));
        assert_eq!(parse_reply("「めがね」"), Some("めがね".to_string()));
        assert_eq!(parse_reply("  メガネ。\n"), Some("めがね".to_string()));
        assert_eq!(parse_reply("   "), None);
        assert_eq!(parse_reply("。"), None);
    }

    #[test]
    fn test_ai_move_accessors() {
        let word = Word::parse("めがね").expect("valid");
        let ai_move = AiMove::Fallback(word.clone());
        assert_eq!(ai_move.word(), Some(&word));
        assert_eq!(ai_move.source(), Some(MoveSource::Fallback));
        assert_eq!(AiMove::Exhausted.source(), None);
    }

    #[test]
    fn test_mover_error_has_no_source() {
        use std::error::Error;

        let err = MoverError::TimedOut(Duration::from_millis(50));
        assert!(err.source().is_none());
        assert!(err.to_string().contains("50ms"));
    }

    #[test]
    fn test_fallback_only_has_no_primary() {
        let fallback = DictionaryMover::new(Arc::new(FallbackDictionary::builtin()));
        let offline: FallbackMover<DictionaryMover, _> =
            FallbackMover::fallback_only(fallback.clone());
        assert!(!offline.has_primary());
        assert!(FallbackMover::new(fallback.clone(), fallback).has_primary());
    }

    #[test]
    fn test_prompt_mentions_head_and_history() {
        let history = History::from_client(&["あめ"]).expect("valid");
        let request = GenerationRequest::new('め', &history);
        let message = user_message(&request);
        assert!(message.contains("あめ"));
        assert!(message.contains('め'));
        assert!(system_prompt('め').contains('ん'));
    }
}
