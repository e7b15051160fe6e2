//! Fallback dictionary used when the model can't produce a legal word.

use crate::config::ConfigError;
use crate::kana;
use crate::word::Word;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Built-in word pools, keyed by head.
const BUILTIN_WORDS: &[(char, &[&str])] = &[
    ('あ', &["あり", "あめ", "あさ", "あひる", "あたま"]),
    ('い', &["いぬ", "いけ", "いか", "いちご", "いす"]),
    ('う', &["うし", "うみ", "うた", "うさぎ", "うちわ"]),
    ('え', &["えび", "えき", "えのぐ", "えだ", "えんぴつ"]),
    ('お', &["おに", "おか", "おゆ", "おばけ", "おもち"]),
    ('か', &["かめ", "かさ", "からす", "かき", "かぶと"]),
    ('き', &["きつね", "きのこ", "きく", "きって", "きもの"]),
    ('く', &["くま", "くき", "くるま", "くつ", "くじら"]),
    ('け', &["けむし", "けしき", "けが", "けいと", "けむり"]),
    ('こ', &["ことり", "こめ", "こおり", "こま", "こけし"]),
    ('さ', &["さかな", "さる", "さくら", "さいふ", "さら"]),
    ('し', &["しろ", "しお", "しか", "しまうま", "しっぽ"]),
    ('す', &["すいか", "すずめ", "すな", "すし", "すもう"]),
    ('せ', &["せみ", "せかい", "せんべい", "せなか", "せき"]),
    ('そ', &["そら", "そば", "そり", "そうじ", "そで"]),
    ('た', &["たまご", "たに", "たこ", "たぬき", "たいこ"]),
    ('ち', &["ちず", "ちから", "ちくわ", "ちょう", "ちり"]),
    ('つ', &["つき", "つばさ", "つち", "つくえ", "つめ"]),
    ('て', &["てがみ", "てぶくろ", "てんぷら", "てら", "てまり"]),
    ('と', &["とら", "とけい", "とまと", "とり", "とびら"]),
    ('な', &["なす", "なべ", "なみ", "なし", "なまず"]),
    ('に', &["にわ", "にく", "にじ", "にもつ", "にわとり"]),
    ('ぬ', &["ぬいぐるみ", "ぬの", "ぬま", "ぬりえ"]),
    ('ね', &["ねこ", "ねぎ", "ねずみ", "ねじ", "ねっこ"]),
    ('の', &["のり", "のはら", "のこぎり", "のみ", "のうか"]),
    ('は', &["はさみ", "はな", "はっぱ", "はし", "はと"]),
    ('ひ', &["ひこうき", "ひつじ", "ひみつ", "ひよこ", "ひまわり"]),
    ('ふ', &["ふね", "ふく", "ふじ", "ふくろう", "ふえ"]),
    ('へ', &["へび", "へや", "へいたい", "へそ", "へちま"]),
    ('ほ', &["ほし", "ほね", "ほたる", "ほうき", "ほたて"]),
    ('ま', &["まくら", "まめ", "まど", "まり", "まつり"]),
    ('み', &["みず", "みち", "みかづき", "みみ", "みそ"]),
    ('む', &["むし", "むぎ", "むね", "むら", "むすめ"]),
    ('め', &["めがね", "めだか", "めんたいこ", "めじろ", "めだま"]),
    ('も', &["もも", "もり", "もち", "もぐら", "もみじ"]),
    ('や', &["やま", "やさい", "やぎ", "やね", "やかた"]),
    ('ゆ', &["ゆき", "ゆめ", "ゆび", "ゆかた", "ゆり"]),
    ('よ', &["ようふく", "よる", "よこ", "よっと", "よだれ"]),
    ('ら', &["らっこ", "らっぱ", "らくだ", "らいち", "らくがき"]),
    ('り', &["りす", "りんご", "りょうり", "りか", "りゅう"]),
    ('る', &["るす", "るつぼ", "るーれっと", "るり", "るびー"]),
    ('れ', &["れいぞうこ", "れたす", "れきし", "れっしゃ", "れんが"]),
    ('ろ', &["ろうそく", "ろぼっと", "ろてんぶろ", "ろば", "ろうか"]),
    ('わ', &["わに", "わごむ", "わた", "わし", "わたあめ"]),
    ('が', &["がっこう", "がいこつ", "がちょう", "がけ"]),
    ('ぎ', &["ぎたー", "ぎょうざ", "ぎふ", "ぎんが"]),
    ('ぐ', &["ぐみ", "ぐらす", "ぐるめ", "ぐんて"]),
    ('げ', &["げた", "げーむ", "げっこう", "げんき"]),
    ('ご', &["ごま", "ごりら", "ごぼう", "ごみばこ"]),
    ('ざ', &["ざる", "ざりがに", "ざっし", "ざしき"]),
    ('じ', &["じしょ", "じしゃく", "じどうしゃ", "じてんしゃ", "じめじめ"]),
    ('ず', &["ずけい", "ずし", "ずつう", "ずこう"]),
    ('ぜ', &["ぜんまい", "ぜりー", "ぜっけい"]),
    ('ぞ', &["ぞう", "ぞうげ", "ぞうり"]),
    ('だ', &["だんご", "だちょう", "だいく", "だるま"]),
    ('で', &["でんわ", "でんしゃ", "でぐち", "でこぼこ"]),
    ('ど', &["どんぐり", "どうぶつ", "どろ", "どあ"]),
    ('ば', &["ばなな", "ばった", "ばけつ", "ばら"]),
    ('び', &["びわ", "びすけっと", "びじゅつ", "びーだま"]),
    ('ぶ', &["ぶた", "ぶどう", "ぶらんこ", "ぶたい"]),
    ('べ', &["べんとう", "べっど", "べる"]),
    ('ぼ', &["ぼうし", "ぼたもち", "ぼーる", "ぼうえき"]),
    ('ぱ', &["ぱすた", "ぱんだ", "ぱせり", "ぱいなっぷる"]),
    ('ぴ', &["ぴあの", "ぴざ", "ぴえろ"]),
    ('ぷ', &["ぷらむ", "ぷーる", "ぷりずむ"]),
    ('ぺ', &["ぺだる", "ぺんき", "ぺっと"]),
    ('ぽ', &["ぽすと", "ぽっと", "ぽけっと"]),
];

/// On-disk dictionary layout.
///
/// ```toml
/// [words]
/// "あ" = ["あり", "あめ"]
/// ```
#[derive(Debug, Deserialize)]
struct DictionaryFile {
    words: BTreeMap<String, Vec<String>>,
}

/// Read-only mapping from head character to a pool of fallback words.
///
/// Words are filed under their computed head, and words the AI could never
/// play (invalid, or ending in `ん`) are dropped on construction. Pools are
/// ordered so that [`FallbackDictionary::pick`] is deterministic.
#[derive(Debug, Clone, Default)]
pub struct FallbackDictionary {
    pools: BTreeMap<char, BTreeSet<Word>>,
}

impl FallbackDictionary {
    /// The dictionary compiled into the binary.
    #[instrument]
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_WORDS
                .iter()
                .map(|(head, words)| (head.to_string(), words.iter().map(|w| w.to_string()))),
        )
    }

    /// Loads a dictionary from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading dictionary from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("Failed to read dictionary file: {}", e))
        })?;

        let file: DictionaryFile = toml::from_str(&content).map_err(|e| {
            ConfigError::new(format!("Failed to parse dictionary: {}", e))
        })?;

        let dictionary = Self::from_entries(file.words);
        info!(words = dictionary.len(), "Dictionary loaded");
        Ok(dictionary)
    }

    /// Builds a dictionary from `(listed head, words)` entries.
    #[instrument(skip(entries))]
    pub fn from_entries<K, I, W>(entries: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut pools: BTreeMap<char, BTreeSet<Word>> = BTreeMap::new();

        for (listed_head, words) in entries {
            let listed_head = listed_head.as_ref();
            for raw in words {
                let cleaned = kana::clean_input(raw.as_ref());
                let word = match Word::parse(&cleaned) {
                    Ok(word) => word,
                    Err(e) => {
                        warn!(word = %raw.as_ref(), error = %e, "Skipping invalid dictionary word");
                        continue;
                    }
                };
                if word.ends_in_forbidden() {
                    warn!(word = %word, "Skipping dictionary word that ends the game");
                    continue;
                }
                if kana::head_of(listed_head) != Some(word.head()) {
                    debug!(word = %word, listed_head, "Filing word under its actual head");
                }
                pools.entry(word.head()).or_default().insert(word);
            }
        }

        Self { pools }
    }

    /// Picks the first word starting with `required_head` that isn't excluded.
    ///
    /// Returns `None` when the pool for that head is exhausted.
    #[instrument(skip(self, excluded), fields(excluded = excluded.len()))]
    pub fn pick(&self, required_head: char, excluded: &HashSet<Word>) -> Option<Word> {
        let picked = self
            .candidates(required_head)
            .find(|word| !excluded.contains(*word))
            .cloned();
        debug!(picked = ?picked.as_ref().map(Word::as_str), "Fallback pick");
        picked
    }

    /// All words starting with `head`, in pick order.
    pub fn candidates(&self, head: char) -> impl Iterator<Item = &Word> {
        self.pools.get(&head).into_iter().flatten()
    }

    /// Heads that have at least one word.
    pub fn heads(&self) -> impl Iterator<Item = char> + '_ {
        self.pools.keys().copied()
    }

    /// Total number of words.
    pub fn len(&self) -> usize {
        self.pools.values().map(BTreeSet::len).sum()
    }

    /// True if the dictionary holds no words.
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
