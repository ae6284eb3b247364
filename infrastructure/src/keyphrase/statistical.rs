//! Frequency-ranked keyphrases without a model.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tabula_application::{KeyphraseError, KeyphraseExtractor};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+").expect("valid regex")
});

/// Tokens this short never make useful search terms.
const MIN_TOKEN_CHARS: usize = 3;

const STOPWORDS: &[&str] = &[
    // English
    "the", "and", "for", "are", "was", "were", "with", "what", "which", "who", "whom", "this",
    "that", "these", "those", "there", "their", "from", "about", "into", "have", "has", "had",
    "how", "why", "when", "where", "can", "could", "would", "should", "will", "shall", "may",
    "might", "any", "all", "some", "does", "did", "not", "you", "your", "our", "its", "than",
    "then", "them", "they", "also", "more", "most", "such", "only", "very", "just", "been",
    "being", "show", "list", "tell", "give", "find", "please",
    // Russian
    "что", "как", "какие", "какой", "какая", "каких", "какое", "для", "при", "или", "это",
    "этот", "эта", "эти", "того", "тот", "так", "там", "тут", "где", "когда", "кто", "чем",
    "чего", "его", "она", "они", "оно", "нас", "вас", "над", "под", "без", "про", "после",
    "перед", "между", "есть", "был", "была", "были", "быть", "все", "всё", "всех", "уже",
    "ещё", "еще", "также", "только", "можно", "нужно", "надо", "если", "чтобы", "который",
    "которые", "которых", "покажи", "скажи", "найди", "расскажи",
];

/// Ranks question tokens by frequency, ties broken by first occurrence.
#[derive(Debug, Clone, Default)]
pub struct StatisticalKeyphraseExtractor;

impl StatisticalKeyphraseExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn keyphrases(&self, text: &str, max: usize) -> Vec<String> {
        let lowered = text.to_lowercase();

        // token -> (count, first position)
        let mut stats: HashMap<&str, (usize, usize)> = HashMap::new();
        for (position, token) in TOKEN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|t| !STOPWORDS.contains(t))
            .enumerate()
        {
            stats.entry(token).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(&str, usize, usize)> = stats
            .into_iter()
            .map(|(token, (count, first))| (token, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(max)
            .map(|(token, _, _)| token.to_string())
            .collect()
    }
}

#[async_trait]
impl KeyphraseExtractor for StatisticalKeyphraseExtractor {
    async fn extract(&self, text: &str, max: usize) -> Result<Vec<String>, KeyphraseError> {
        Ok(self.keyphrases(text, max))
    }
}
