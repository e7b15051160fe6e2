//! Tests for move legality.

use shiritori::{History, LegalWord, RuleViolation, Word, validate};
use std::error::Error;

fn history(words: &[&str]) -> History {
    History::from_client(words).expect("valid history")
}

#[test]
fn test_first_word_has_no_head_requirement() {
    let h = History::new();
    let word = validate(&h, "しりとり", None).expect("legal first word");
    assert_eq!(word.tail(), 'り');
}

#[test]
fn test_wrong_head_is_rejected() {
    let h = history(&["あめ", "めがね"]);
    assert_eq!(
        validate(&h, "いぬ", h.required_head()),
        Err(RuleViolation::WrongHead {
            word: "いぬ".to_string(),
            expected: 'ね',
            found: 'い',
        })
    );
}

#[test]
fn test_small_kana_tail_chains_on_base() {
    let h = history(&["でんしゃ"]);
    assert_eq!(h.required_head(), Some('や'));
    assert!(validate(&h, "やま", h.required_head()).is_ok());
}

#[test]
fn test_long_vowel_tail_chains_on_vowel() {
    let h = history(&["こーひー"]);
    assert_eq!(h.required_head(), Some('い'));
    assert!(validate(&h, "いぬ", h.required_head()).is_ok());
    assert!(matches!(
        validate(&h, "ひつじ", h.required_head()),
        Err(RuleViolation::WrongHead { .. })
    ));
}

#[test]
fn test_duplicate_is_rejected_with_message() {
    let h = history(&["かめ", "めだか"]);
    let violation = validate(&h, "かめ", h.required_head()).expect_err("duplicate");
    assert_eq!(violation, RuleViolation::Duplicate("かめ".to_string()));
    assert!(!violation.is_terminal());
    assert!(violation.player_message().contains("かめ"));
}

#[test]
fn test_forbidden_tail_is_terminal() {
    let h = history(&["あめ"]);
    let violation = validate(&h, "めろん", h.required_head()).expect_err("ends in ん");
    assert_eq!(violation, RuleViolation::EndsInForbidden("めろん".to_string()));
    assert!(violation.is_terminal());
}

#[test]
fn test_empty_input_has_its_own_message() {
    let violation = validate(&History::new(), "", None).expect_err("empty");
    assert_eq!(violation.player_message(), "ことばを入力してね");
}

#[test]
fn test_legal_word_composite_on_parsed_word() {
    let h = history(&["あめ"]);
    let word = Word::parse("めだか").expect("valid word");
    assert!(LegalWord::check(&word, &h, Some('め')).is_ok());
    assert!(LegalWord::check(&word, &h, Some('か')).is_err());
}

#[test]
fn test_violations_are_errors_without_source() {
    let violations = [
        RuleViolation::InvalidCharacters("abc".to_string()),
        RuleViolation::Duplicate("あめ".to_string()),
        RuleViolation::EndsInForbidden("ほん".to_string()),
    ];
    for violation in violations {
        let err: &dyn Error = &violation;
        assert!(err.source().is_none());
        assert!(!err.to_string().is_empty());
    }
}
