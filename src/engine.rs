//! Stateless turn engine.
//!
//! Each call to [`TurnEngine::process_turn`] rebuilds the game from the
//! client's history, adjudicates the user's word, asks the AI for a reply,
//! and reports the outcome. Nothing is kept between calls.

use crate::config::{ConfigError, ServerConfig};
use crate::history::{History, HistoryError, MAX_TURNS};
use crate::kana;
use crate::llm_client::LlmClient;
use crate::mover::{AiMove, DictionaryMover, FallbackMover, ModelMover, MoveProvider, MoveSource};
use crate::rules::{LegalWord, RuleViolation};
use crate::word::Word;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The production engine: LLM first, dictionary second.
pub type ShiritoriEngine = TurnEngine<FallbackMover<ModelMover<LlmClient>, DictionaryMover>>;

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The user's word was illegal input; they may try again.
    Rejected(RuleViolation),
    /// The user played a word ending in `ん` and lost.
    UserLoss(RuleViolation),
    /// The AI could not find a legal word; the user wins.
    AiExhausted,
    /// Both players moved; the game goes on.
    Continue {
        /// The AI's word.
        ai_word: Word,
        /// Head the user's next word must start with.
        next_head: char,
    },
    /// The turn cap was reached. Carries the AI's final word when the cap
    /// was reached by this turn.
    TurnCapReached {
        /// The AI's final word, if it moved this turn.
        ai_word: Option<Word>,
    },
}

impl TurnOutcome {
    /// True for every outcome except `Rejected` and `Continue`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TurnOutcome::Rejected(_) | TurnOutcome::Continue { .. })
    }
}

/// Who won a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Winner {
    /// The human player.
    User,
    /// The AI opponent.
    Ai,
    /// Nobody; the game ran out of turns.
    #[serde(rename = "none")]
    #[strum(to_string = "none")]
    Draw,
}

/// Everything a client needs after one call.
#[derive(Debug, Clone, Getters)]
pub struct TurnResult {
    /// How the turn ended.
    outcome: TurnOutcome,
    /// The user's word after cleaning.
    user_word: String,
    /// History including every word accepted this turn.
    history: History,
    /// Completed exchanges after this turn.
    turn_count: usize,
    /// Where the AI's word came from.
    source: Option<MoveSource>,
}

impl TurnResult {
    /// False when the user's word was not accepted as a winning-or-neutral
    /// move, or when no move could be made at all.
    pub fn is_ok(&self) -> bool {
        match &self.outcome {
            TurnOutcome::Rejected(_) | TurnOutcome::UserLoss(_) => false,
            TurnOutcome::TurnCapReached { ai_word } => ai_word.is_some(),
            TurnOutcome::AiExhausted | TurnOutcome::Continue { .. } => true,
        }
    }

    /// True once the game is over.
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// The winner, once the game is over.
    pub fn winner(&self) -> Option<Winner> {
        match &self.outcome {
            TurnOutcome::UserLoss(_) => Some(Winner::Ai),
            TurnOutcome::AiExhausted => Some(Winner::User),
            TurnOutcome::TurnCapReached { .. } => Some(Winner::Draw),
            TurnOutcome::Rejected(_) | TurnOutcome::Continue { .. } => None,
        }
    }

    /// The AI's word, if it moved.
    pub fn ai_word(&self) -> Option<&Word> {
        match &self.outcome {
            TurnOutcome::Continue { ai_word, .. } => Some(ai_word),
            TurnOutcome::TurnCapReached { ai_word } => ai_word.as_ref(),
            _ => None,
        }
    }

    /// Head the user's next word must start with, while the game goes on.
    pub fn next_head(&self) -> Option<char> {
        match &self.outcome {
            TurnOutcome::Continue { next_head, .. } => Some(*next_head),
            _ => None,
        }
    }

    /// Message shown to the player.
    pub fn message(&self) -> String {
        match &self.outcome {
            TurnOutcome::Rejected(violation) | TurnOutcome::UserLoss(violation) => {
                violation.player_message()
            }
            TurnOutcome::AiExhausted => "AIはこたえられなかったよ。あなたのかち！".to_string(),
            TurnOutcome::Continue { next_head, .. } => {
                format!("つぎは『{}』からはじめてね", next_head)
            }
            TurnOutcome::TurnCapReached { ai_word: Some(_) } => {
                "きょうはここまで！またあそぼうね".to_string()
            }
            TurnOutcome::TurnCapReached { ai_word: None } => {
                format!("{}かいまでだよ。さいしょからやりなおしてね", MAX_TURNS)
            }
        }
    }
}

/// Adjudicates one turn per call.
#[derive(Debug, Clone)]
pub struct TurnEngine<P> {
    mover: P,
}

impl<P: MoveProvider> TurnEngine<P> {
    /// Creates an engine around an AI move provider.
    pub fn new(mover: P) -> Self {
        Self { mover }
    }

    /// Processes the user's word against the client-supplied history.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the history is malformed. Rule
    /// violations are not errors; they are reported in the outcome.
    #[instrument(skip(self, history), fields(history_len = history.len()))]
    pub async fn process_turn<S: AsRef<str>>(
        &self,
        history: &[S],
        user_word: &str,
    ) -> Result<TurnResult, HistoryError> {
        let mut history = History::from_client(history)?;
        let user_word = kana::clean_input(user_word);

        if history.is_at_turn_cap() {
            info!(turns = history.turn_count(), "Turn cap already reached");
            return Ok(Self::finish(
                TurnOutcome::TurnCapReached { ai_word: None },
                user_word,
                history,
                None,
            ));
        }

        let required_head = history.required_head();
        debug!(?required_head, user_word = %user_word, "Awaiting user word");

        let word = match Word::parse(&user_word) {
            Ok(word) => word,
            Err(violation) => {
                info!(%violation, "User word rejected");
                return Ok(Self::finish(TurnOutcome::Rejected(violation), user_word, history, None));
            }
        };

        match LegalWord::check(&word, &history, required_head) {
            Ok(()) => {}
            Err(violation) if violation.is_terminal() => {
                info!(%violation, "User loses");
                history.push(word)?;
                return Ok(Self::finish(TurnOutcome::UserLoss(violation), user_word, history, None));
            }
            Err(violation) => {
                info!(%violation, "User word rejected");
                return Ok(Self::finish(TurnOutcome::Rejected(violation), user_word, history, None));
            }
        }

        let ai_head = word.tail();
        history.push(word)?;
        debug!(%ai_head, "Awaiting AI word");

        let ai_move = self.mover.propose_move(&history, ai_head).await;
        let source = ai_move.source();
        let ai_word = match ai_move {
            AiMove::Model(word) | AiMove::Fallback(word) => word,
            AiMove::Exhausted => {
                warn!(%ai_head, "AI exhausted");
                return Ok(Self::finish(TurnOutcome::AiExhausted, user_word, history, None));
            }
        };

        history.push(ai_word.clone())?;

        let outcome = if history.is_at_turn_cap() {
            info!(turns = history.turn_count(), "Turn cap reached");
            TurnOutcome::TurnCapReached {
                ai_word: Some(ai_word),
            }
        } else {
            TurnOutcome::Continue {
                next_head: ai_word.tail(),
                ai_word,
            }
        };

        Ok(Self::finish(outcome, user_word, history, source))
    }

    fn finish(
        outcome: TurnOutcome,
        user_word: String,
        history: History,
        source: Option<MoveSource>,
    ) -> TurnResult {
        TurnResult {
            turn_count: history.turn_count(),
            outcome,
            user_word,
            history,
            source,
        }
    }
}

/// Builds the production engine from configuration.
///
/// Without an API key for the configured provider the engine plays from
/// the dictionary alone.
///
/// # Errors
///
/// Returns [`ConfigError`] if a configured dictionary file can't be loaded.
#[instrument(skip(config), fields(provider = ?config.llm_provider()))]
pub fn build_engine(config: &ServerConfig) -> Result<ShiritoriEngine, ConfigError> {
    let dictionary = Arc::new(config.load_dictionary()?);
    info!(words = dictionary.len(), "Fallback dictionary ready");
    let fallback = DictionaryMover::new(dictionary);

    let mover = match config.create_llm_config() {
        Ok(llm_config) => {
            let model = ModelMover::new(LlmClient::new(llm_config), config.llm_timeout());
            FallbackMover::new(model, fallback)
        }
        Err(e) => {
            debug!(error = %e.message, "LLM config unavailable");
            FallbackMover::fallback_only(fallback)
        }
    };

    if mover.has_primary() {
        info!(model = %config.llm_model(), "AI moves come from the model first");
    } else {
        warn!("No LLM available, playing from the dictionary only");
    }

    Ok(TurnEngine::new(mover))
}
