//! The `Word` type: a validated hiragana word with its chain characters.

use crate::kana::{self, FORBIDDEN_TAIL};
use crate::rules::RuleViolation;
use std::borrow::Borrow;
use std::hash::{Hash, Hasher};
use tracing::instrument;

/// A non-empty hiragana word.
///
/// Construction goes through [`Word::parse`], so every `Word` contains only
/// accepted characters and has a defined head and tail. Equality, ordering
/// and hashing look at the text alone.
#[derive(Debug, Clone, derive_more::Display)]
#[display("{text}")]
pub struct Word {
    text: String,
    head: char,
    tail: char,
}

impl Word {
    /// Parses already-cleaned text into a word.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::InvalidCharacters`] if `text` is empty,
    /// contains a character outside the accepted set, or has no kana to
    /// chain from (for example a lone `ー`).
    #[instrument]
    pub fn parse(text: &str) -> Result<Self, RuleViolation> {
        let invalid = || RuleViolation::InvalidCharacters(text.to_string());

        if text.is_empty() || !text.chars().all(kana::is_accepted) {
            return Err(invalid());
        }
        let head = kana::head_of(text).ok_or_else(invalid)?;
        let tail = kana::tail_of(text).ok_or_else(invalid)?;

        Ok(Self {
            text: text.to_string(),
            head,
            tail,
        })
    }

    /// Normalized first sound.
    pub fn head(&self) -> char {
        self.head
    }

    /// Normalized last sound.
    pub fn tail(&self) -> char {
        self.tail
    }

    /// True if the word ends on the forbidden terminal character.
    pub fn ends_in_forbidden(&self) -> bool {
        self.tail == FORBIDDEN_TAIL
    }

    /// The word's text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the word, returning its text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Word {}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for Word {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Word {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.text.cmp(&other.text)
    }
}

impl Borrow<str> for Word {
    fn borrow(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_computes_head_and_tail() {
        let word = Word::parse("きしゃ").expect("valid word");
        assert_eq!(word.head(), 'き');
        assert_eq!(word.tail(), 'や');
        assert!(!word.ends_in_forbidden());
    }

    #[test]
    fn test_single_character_word() {
        let word = Word::parse("え").expect("valid word");
        assert_eq!(word.head(), word.tail());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in ["", "ー", "ーあ", "あa", "アメ", "あ め"] {
            assert!(
                matches!(Word::parse(bad), Err(RuleViolation::InvalidCharacters(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_forbidden_tail() {
        assert!(Word::parse("ほん").expect("valid").ends_in_forbidden());
        assert!(Word::parse("らーめん").expect("valid").ends_in_forbidden());
    }
}
