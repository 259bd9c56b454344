//! Domain lexicon: categorized brewing vocabulary and the stopword list.
//!
//! The validator scores domain relevance against this vocabulary, and the
//! enricher records per-category hit counts in chunk metadata. Single-word
//! terms match whole tokens; multi-word terms match as substrings of the
//! lowercased text.

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};

/// Keyword categories, in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeywordCategory {
    Process,
    Ingredients,
    Equipment,
    Styles,
    Measurements,
    Techniques,
}

impl KeywordCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Process => "process",
            Self::Ingredients => "ingredients",
            Self::Equipment => "equipment",
            Self::Styles => "styles",
            Self::Measurements => "measurements",
            Self::Techniques => "techniques",
        }
    }
}

/// Brewing vocabulary by category
pub const BREWING_KEYWORDS: &[(KeywordCategory, &[&str])] = &[
    (
        KeywordCategory::Process,
        &["mash", "boil", "ferment", "condition", "bottle", "keg"],
    ),
    (
        KeywordCategory::Ingredients,
        &["malt", "hops", "yeast", "water", "barley", "wheat", "rye"],
    ),
    (
        KeywordCategory::Equipment,
        &[
            "kettle",
            "mash tun",
            "fermenter",
            "bottles",
            "kegs",
            "thermometer",
        ],
    ),
    (
        KeywordCategory::Styles,
        &["lager", "ale", "stout", "ipa", "pilsner", "porter", "wheat"],
    ),
    (
        KeywordCategory::Measurements,
        &["gravity", "abv", "ibu", "srm", "ph", "temperature"],
    ),
    (
        KeywordCategory::Techniques,
        &["dry hopping", "cold crashing", "lagering", "sparging"],
    ),
];

/// Common English stopwords excluded from meaningful-word counts and
/// stripped by the optional preprocessing stage.
const STOPWORD_LIST: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "could", "did", "do",
    "does", "for", "from", "had", "has", "have", "he", "her", "his", "how", "i", "if", "in",
    "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "not", "of", "on", "or",
    "our", "she", "so", "some", "such", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "to", "was", "we", "were", "what", "when", "where", "which", "who",
    "will", "with", "would", "you", "your",
];

static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOPWORD_LIST.iter().copied().collect());

/// Whether a lowercased token is a stopword
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Count distinct lexicon terms present in the text, per category.
///
/// Each term contributes at most one hit. Expects `text_lower` to be the
/// lowercased document and `tokens` its whitespace tokens with punctuation
/// trimmed.
pub fn keyword_hits(text_lower: &str, tokens: &[&str]) -> BTreeMap<KeywordCategory, usize> {
    let token_set: HashSet<&str> = tokens.iter().copied().collect();

    let mut hits = BTreeMap::new();
    for (category, terms) in BREWING_KEYWORDS {
        let count = terms
            .iter()
            .filter(|term| {
                if term.contains(' ') {
                    text_lower.contains(*term)
                } else {
                    token_set.contains(*term)
                }
            })
            .count();
        hits.insert(*category, count);
    }
    hits
}

/// Total hits across all categories
pub fn total_hits(hits: &BTreeMap<KeywordCategory, usize>) -> usize {
    hits.values().sum()
}

/// Strip leading and trailing non-alphanumeric characters from a token
pub fn trim_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}
