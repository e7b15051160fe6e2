//! Word history, rebuilt from client data on every request.

use crate::kana;
use crate::word::Word;
use derive_more::{Display, Error};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

/// Maximum number of completed user + AI exchanges in one game.
pub const MAX_TURNS: usize = 20;

/// Most words a finished game can hold.
pub const MAX_WORDS: usize = MAX_TURNS * 2;

/// Ordered, duplicate-free sequence of played words.
///
/// The user moves first, so even indices are user words and odd indices
/// are AI words.
#[derive(Debug, Clone, Default)]
pub struct History {
    words: Vec<Word>,
    used: HashSet<Word>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds history from the strings a client sent back.
    ///
    /// Entries are cleaned like player input and empty entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if an entry is not a valid word, appears
    /// twice, or there are more than [`MAX_WORDS`] words. Such a history
    /// can't have come from this engine.
    #[instrument(skip(entries), fields(entries = entries.len()))]
    pub fn from_client<S: AsRef<str>>(entries: &[S]) -> Result<Self, HistoryError> {
        let mut history = Self::new();
        for entry in entries {
            let cleaned = kana::clean_input(entry.as_ref());
            if cleaned.is_empty() {
                continue;
            }
            let word = Word::parse(&cleaned).map_err(|e| {
                warn!(entry = %entry.as_ref(), error = %e, "Invalid word in client history");
                HistoryError::new(format!("history contains an invalid word: {}", entry.as_ref()))
            })?;
            if history.len() == MAX_WORDS {
                warn!(max = MAX_WORDS, "Client history longer than a full game");
                return Err(HistoryError::new(format!(
                    "history has more than {} words",
                    MAX_WORDS
                )));
            }
            history.push(word)?;
        }
        debug!(len = history.len(), "History rebuilt");
        Ok(history)
    }

    /// Appends a word.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the word was already played.
    #[instrument(skip(self, word), fields(word = %word))]
    pub fn push(&mut self, word: Word) -> Result<(), HistoryError> {
        if !self.used.insert(word.clone()) {
            return Err(HistoryError::new(format!(
                "history contains a duplicate word: {}",
                word
            )));
        }
        self.words.push(word);
        Ok(())
    }

    /// True if `word` has already been played.
    pub fn contains(&self, word: &str) -> bool {
        self.used.contains(word)
    }

    /// The most recent word.
    pub fn last(&self) -> Option<&Word> {
        self.words.last()
    }

    /// The head the next word must start with, `None` before the first move.
    pub fn required_head(&self) -> Option<char> {
        self.last().map(Word::tail)
    }

    /// Number of completed user + AI exchanges.
    pub fn turn_count(&self) -> usize {
        self.words.len() / 2
    }

    /// True once the turn cap has been reached.
    pub fn is_at_turn_cap(&self) -> bool {
        self.turn_count() >= MAX_TURNS
    }

    /// All words in play order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Set view of played words.
    pub fn used(&self) -> &HashSet<Word> {
        &self.used
    }

    /// Number of words played.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if nothing has been played.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words as plain strings, ready to send back to the client.
    pub fn to_strings(&self) -> Vec<String> {
        self.words.iter().map(|w| w.as_str().to_string()).collect()
    }
}

/// Malformed client history.
#[derive(Debug, Clone, Display, Error)]
#[display("History error: {} at {}:{}", message, file, line)]
pub struct HistoryError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl HistoryError {
    /// Creates a new history error.
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
