//! Tests for the fallback dictionary.

use shiritori::{FallbackDictionary, History};
use std::collections::HashSet;
use std::io::Write;

#[test]
fn test_pick_is_deterministic() {
    let dict = FallbackDictionary::builtin();
    let used = HashSet::new();
    let first = dict.pick('め', &used).expect("word for め");
    let second = dict.pick('め', &used).expect("word for め");
    assert_eq!(first, second);
    assert_eq!(first.as_str(), "めがね");
}

#[test]
fn test_pick_skips_used_words() {
    let dict = FallbackDictionary::builtin();
    let history = History::from_client(&["あめ", "めがね"]).expect("valid history");
    let picked = dict.pick('め', history.used()).expect("another word for め");
    assert_eq!(picked.as_str(), "めじろ");
}

#[test]
fn test_pick_exhausts() {
    let dict = FallbackDictionary::from_entries([("ぬ", vec!["ぬの"])]);
    let history = History::from_client(&["ぬの"]).expect("valid history");
    assert_eq!(dict.pick('ぬ', history.used()), None);
    assert_eq!(dict.pick('ゑ', &HashSet::new()), None);
}

#[test]
fn test_builtin_words_are_all_playable() {
    let dict = FallbackDictionary::builtin();
    assert!(!dict.is_empty());
    for head in dict.heads() {
        for word in dict.candidates(head) {
            assert_eq!(word.head(), head);
            assert!(!word.ends_in_forbidden(), "{} ends the game", word);
        }
    }
}

#[test]
fn test_load_from_toml() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
[words]
"あ" = ["あめ", "アリ", "ほん", "いぬ", "abc"]
"#
    )
    .expect("write dictionary");

    let dict = FallbackDictionary::from_file(file.path()).expect("dictionary loads");
    assert_eq!(dict.len(), 3);

    let a_words: Vec<_> = dict.candidates('あ').map(|w| w.as_str()).collect();
    assert_eq!(a_words, vec!["あめ", "あり"]);
    assert_eq!(dict.candidates('い').count(), 1);
    assert_eq!(dict.candidates('ほ').count(), 0);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = FallbackDictionary::from_file(dir.path().join("missing.toml"));
    assert!(result.is_err());
}
