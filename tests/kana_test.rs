//! Tests for kana normalization and word parsing.

use shiritori::kana::{FORBIDDEN_TAIL, clean_input, head_of, tail_of, vowel_of};
use shiritori::{RuleViolation, Word};

#[test]
fn test_clean_input_converts_katakana_and_strips_spaces() {
    assert_eq!(clean_input(" リンゴ "), "りんご");
    assert_eq!(clean_input("コーヒー"), "こーひー");
    assert_eq!(clean_input("め　だ か"), "めだか");
    assert_eq!(clean_input("abc"), "abc");
}

#[test]
fn test_head_normalizes_small_kana() {
    assert_eq!(head_of("ゃま"), Some('や'));
    assert_eq!(head_of("あめ"), Some('あ'));
    assert_eq!(head_of(""), None);
    assert_eq!(head_of("ーる"), None);
}

#[test]
fn test_tail_rules() {
    assert_eq!(tail_of("しゃしんき"), Some('き'));
    assert_eq!(tail_of("でんしゃ"), Some('や'));
    assert_eq!(tail_of("きって"), Some('て'));
    assert_eq!(tail_of("ろーらー"), Some('あ'));
    assert_eq!(tail_of("るびー"), Some('い'));
    assert_eq!(tail_of("みかん"), Some(FORBIDDEN_TAIL));
    assert_eq!(tail_of("ー"), None);
}

#[test]
fn test_vowel_table() {
    assert_eq!(vowel_of('ぱ'), Some('あ'));
    assert_eq!(vowel_of('ゅ'), Some('う'));
    assert_eq!(vowel_of('ん'), None);
    assert_eq!(vowel_of('a'), None);
}

#[test]
fn test_word_parse_computes_head_and_tail() {
    let word = Word::parse("きゃべつ").expect("valid word");
    assert_eq!(word.head(), 'き');
    assert_eq!(word.tail(), 'つ');
    assert!(!word.ends_in_forbidden());
    assert_eq!(word.to_string(), "きゃべつ");

    let word = Word::parse("らーめん").expect("valid word");
    assert!(word.ends_in_forbidden());
}

#[test]
fn test_word_parse_rejects_non_hiragana() {
    for bad in ["", "ame", "雨", "あめ!", "アメ"] {
        assert!(
            matches!(Word::parse(bad), Err(RuleViolation::InvalidCharacters(_))),
            "{:?} should be rejected",
            bad
        );
    }
}
