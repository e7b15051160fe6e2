//! Kana normalization for chaining.
//!
//! Shiritori chains on *sounds*, not code points, so the first and last
//! characters of a word are normalized before comparison:
//!
//! - small-form kana chain as their full-size base (`っ` → `つ`, `ゃ` → `や`)
//! - a trailing long-vowel mark `ー` chains as the vowel it lengthens
//!   (`こーひー` → `い`, `すーぱー` → `あ`)
//!
//! Raw client input is cleaned with [`clean_input`] before any of this runs.

use tracing::instrument;

/// The long-vowel mark (chōonpu).
pub const LONG_VOWEL_MARK: char = 'ー';

/// A word whose tail normalizes to this character loses for its author.
pub const FORBIDDEN_TAIL: char = 'ん';

const HIRAGANA_FIRST: char = '\u{3041}';
const HIRAGANA_LAST: char = '\u{3096}';
const KATAKANA_FIRST: char = '\u{30A1}';
const KATAKANA_LAST: char = '\u{30F6}';
const KATAKANA_TO_HIRAGANA: u32 = 0x60;

/// Returns true for characters a word may contain.
pub fn is_accepted(ch: char) -> bool {
    (HIRAGANA_FIRST..=HIRAGANA_LAST).contains(&ch) || ch == LONG_VOWEL_MARK
}

/// Maps small-form kana to their full-size base; other characters pass through.
pub fn to_base_form(ch: char) -> char {
    match ch {
        'ぁ' => 'あ',
        'ぃ' => 'い',
        'ぅ' => 'う',
        'ぇ' => 'え',
        'ぉ' => 'お',
        'っ' => 'つ',
        'ゃ' => 'や',
        'ゅ' => 'ゆ',
        'ょ' => 'よ',
        'ゎ' => 'わ',
        'ゕ' => 'か',
        'ゖ' => 'け',
        other => other,
    }
}

/// Returns the vowel a kana ends on, or `None` for `ん` and non-kana.
///
/// Small forms share the vowel of their base (`ゃ` ends on `あ`).
pub fn vowel_of(ch: char) -> Option<char> {
    match to_base_form(ch) {
        'あ' | 'か' | 'が' | 'さ' | 'ざ' | 'た' | 'だ' | 'な' | 'は' | 'ば' | 'ぱ' | 'ま'
        | 'や' | 'ら' | 'わ' => Some('あ'),
        'い' | 'き' | 'ぎ' | 'し' | 'じ' | 'ち' | 'ぢ' | 'に' | 'ひ' | 'び' | 'ぴ' | 'み'
        | 'り' | 'ゐ' => Some('い'),
        'う' | 'く' | 'ぐ' | 'す' | 'ず' | 'つ' | 'づ' | 'ぬ' | 'ふ' | 'ぶ' | 'ぷ' | 'む'
        | 'ゆ' | 'る' | 'ゔ' => Some('う'),
        'え' | 'け' | 'げ' | 'せ' | 'ぜ' | 'て' | 'で' | 'ね' | 'へ' | 'べ' | 'ぺ' | 'め'
        | 'れ' | 'ゑ' => Some('え'),
        'お' | 'こ' | 'ご' | 'そ' | 'ぞ' | 'と' | 'ど' | 'の' | 'ほ' | 'ぼ' | 'ぽ' | 'も'
        | 'よ' | 'ろ' | 'を' => Some('お'),
        _ => None,
    }
}

/// Normalized head character of `s`.
///
/// Returns `None` for an empty string or one that starts with the
/// long-vowel mark, which has no sound of its own.
#[instrument]
pub fn head_of(s: &str) -> Option<char> {
    match s.chars().next()? {
        LONG_VOWEL_MARK => None,
        first => Some(to_base_form(first)),
    }
}

/// Normalized tail character of `s`.
///
/// Trailing long-vowel marks are skipped and replaced by the vowel of the
/// kana they lengthen. A kana with no vowel (`ん`) is returned as itself.
/// Returns `None` if `s` contains no kana at all.
#[instrument]
pub fn tail_of(s: &str) -> Option<char> {
    let mut chars = s.chars().rev().peekable();
    let mut lengthened = false;
    while chars.next_if_eq(&LONG_VOWEL_MARK).is_some() {
        lengthened = true;
    }
    let last = chars.next()?;
    if lengthened {
        Some(vowel_of(last).unwrap_or_else(|| to_base_form(last)))
    } else {
        Some(to_base_form(last))
    }
}

/// Cleans raw player input before validation.
///
/// Whitespace (including the ideographic space) is removed and full-width
/// katakana become hiragana. Anything else is kept as-is so that the
/// character check can reject it.
#[instrument]
pub fn clean_input(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| {
            if (KATAKANA_FIRST..=KATAKANA_LAST).contains(&ch) {
                char::from_u32(ch as u32 - KATAKANA_TO_HIRAGANA).unwrap_or(ch)
            } else {
                ch
            }
        })
        .collect()
}
