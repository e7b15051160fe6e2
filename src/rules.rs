//! Move legality for shiritori.
//!
//! Each rule is a named precondition with a `check` method, and
//! [`LegalWord`] composes them in order. [`validate`] is the entry point
//! used by the turn engine and the AI mover alike, so both players are held
//! to identical rules.

use crate::history::History;
use crate::kana::FORBIDDEN_TAIL;
use crate::word::Word;
use tracing::{debug, instrument};

/// Why a candidate word was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RuleViolation {
    /// Empty, or contains characters outside hiragana and `ー`.
    #[display("{:?} is not a hiragana word", _0)]
    InvalidCharacters(#[error(not(source))] String),

    /// The word has already been played.
    #[display("{:?} has already been played", _0)]
    Duplicate(#[error(not(source))] String),

    /// The word doesn't start with the required head.
    #[display("{:?} must start with '{}' but starts with '{}'", word, expected, found)]
    WrongHead {
        /// The offending word.
        word: String,
        /// Head the word had to start with.
        expected: char,
        /// Head the word actually starts with.
        found: char,
    },

    /// The word ends on `ん`. Legal to play, but its author loses.
    #[display("{:?} ends in '{}'", _0, FORBIDDEN_TAIL)]
    EndsInForbidden(#[error(not(source))] String),
}

impl RuleViolation {
    /// True for a move that ends the game rather than one the player may retry.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RuleViolation::EndsInForbidden(_))
    }

    /// Message shown to the player.
    pub fn player_message(&self) -> String {
        match self {
            RuleViolation::InvalidCharacters(text) if text.is_empty() => {
                "ことばを入力してね".to_string()
            }
            RuleViolation::InvalidCharacters(_) => "ひらがなだけで入力してね".to_string(),
            RuleViolation::Duplicate(word) => format!("『{}』はもう使ったよ", word),
            RuleViolation::WrongHead { expected, .. } => {
                format!("『{}』からはじめてね", expected)
            }
            RuleViolation::EndsInForbidden(_) => {
                format!("『{}』で終わったのでまけだよ", FORBIDDEN_TAIL)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the word contains only accepted characters.
pub struct HiraganaOnly;

impl HiraganaOnly {
    /// Parses `candidate`, which must already be cleaned.
    #[instrument]
    pub fn check(candidate: &str) -> Result<Word, RuleViolation> {
        Word::parse(candidate)
    }
}

/// Precondition: the word has not been played yet.
pub struct NotYetUsed;

impl NotYetUsed {
    /// Fails with [`RuleViolation::Duplicate`] if `word` is in `history`.
    #[instrument(skip(word, history), fields(word = %word))]
    pub fn check(word: &Word, history: &History) -> Result<(), RuleViolation> {
        if history.contains(word.as_str()) {
            Err(RuleViolation::Duplicate(word.to_string()))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the word starts with the required head, if there is one.
pub struct StartsWithHead;

impl StartsWithHead {
    /// Fails with [`RuleViolation::WrongHead`] on a head mismatch.
    #[instrument(skip(word), fields(word = %word))]
    pub fn check(word: &Word, required_head: Option<char>) -> Result<(), RuleViolation> {
        match required_head {
            Some(expected) if word.head() != expected => Err(RuleViolation::WrongHead {
                word: word.to_string(),
                expected,
                found: word.head(),
            }),
            _ => Ok(()),
        }
    }
}

/// Precondition: the word does not end on the forbidden character.
pub struct AvoidsForbiddenTail;

impl AvoidsForbiddenTail {
    /// Fails with [`RuleViolation::EndsInForbidden`].
    #[instrument(skip(word), fields(word = %word))]
    pub fn check(word: &Word) -> Result<(), RuleViolation> {
        if word.ends_in_forbidden() {
            Err(RuleViolation::EndsInForbidden(word.to_string()))
        } else {
            Ok(())
        }
    }
}

/// Composite precondition for an already-parsed word.
///
/// Runs duplicate, head and tail checks in that order, stopping at the
/// first failure.
pub struct LegalWord;

impl LegalWord {
    /// Validates all chaining rules for `word`.
    #[instrument(skip(word, history), fields(word = %word))]
    pub fn check(
        word: &Word,
        history: &History,
        required_head: Option<char>,
    ) -> Result<(), RuleViolation> {
        NotYetUsed::check(word, history)?;
        StartsWithHead::check(word, required_head)?;
        AvoidsForbiddenTail::check(word)?;
        Ok(())
    }
}

/// Validates a cleaned candidate against the history.
///
/// Checks run in order: characters, duplicates, head, forbidden tail.
/// On success the parsed word is returned.
///
/// # Errors
///
/// Returns the first [`RuleViolation`] encountered.
#[instrument(skip(history), fields(history_len = history.len()))]
pub fn validate(
    history: &History,
    candidate: &str,
    required_head: Option<char>,
) -> Result<Word, RuleViolation> {
    let word = HiraganaOnly::check(candidate)?;
    LegalWord::check(&word, history, required_head)?;
    debug!(word = %word, "Word is legal");
    Ok(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(words: &[&str]) -> History {
        History::from_client(words).expect("valid history")
    }

    #[test]
    fn test_characters_checked_first() {
        let h = history(&["あめ"]);
        assert!(matches!(
            validate(&h, "ほn", Some('め')),
            Err(RuleViolation::InvalidCharacters(_))
        ));
    }

    #[test]
    fn test_duplicate_before_head() {
        let h = history(&["あめ", "めだか"]);
        assert_eq!(
            validate(&h, "めだか", Some('か')),
            Err(RuleViolation::Duplicate("めだか".to_string()))
        );
    }

    #[test]
    fn test_head_before_forbidden_tail() {
        let h = history(&["あめ"]);
        assert!(matches!(
            validate(&h, "ほん", Some('め')),
            Err(RuleViolation::WrongHead { expected: 'め', found: 'ほ', .. })
        ));
    }

    #[test]
    fn test_forbidden_tail_is_terminal() {
        let result = validate(&History::new(), "ほん", None);
        let err = result.expect_err("ends in ん");
        assert!(err.is_terminal());
        assert!(!RuleViolation::Duplicate("あ".into()).is_terminal());
    }

    #[test]
    fn test_small_kana_head_matches_base() {
        let h = history(&["きしゃ"]);
        let word = validate(&h, "やま", h.required_head()).expect("や follows ゃ");
        assert_eq!(word.as_str(), "やま");
    }
}
