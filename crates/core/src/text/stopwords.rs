use std::collections::{HashMap, HashSet};

/// Built-in English function words dropped during keyword extraction.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his",
    "how", "i", "if", "in", "into", "is", "it", "its", "just", "more", "most", "my", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "would", "you", "your",
];

pub const DEFAULT_LANGUAGE: &str = "en";

/// A stop-word set for one language.
///
/// `is_fallback` is set when the requested language had no list of its own and
/// the English defaults were substituted.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
    language: String,
    is_fallback: bool,
}

impl StopWords {
    pub fn english() -> Self {
        Self {
            words: ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            language: DEFAULT_LANGUAGE.to_string(),
            is_fallback: false,
        }
    }

    pub fn from_words<I, S>(language: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            language: language.to_string(),
            is_fallback: false,
        }
    }

    /// Resolve the list for `language` from caller-supplied lists.
    ///
    /// Lookup is by the primary subtag, so `pt-BR` finds a `pt` list. Without a
    /// match the English defaults are used and flagged as a fallback.
    pub fn for_language(language: &str, custom: &HashMap<String, Vec<String>>) -> Self {
        let primary = primary_subtag(language);

        if let Some(words) = custom.get(&primary) {
            return Self::from_words(&primary, words);
        }

        if primary == DEFAULT_LANGUAGE {
            return Self::english();
        }

        tracing::debug!(
            language = %language,
            "No stop words for language, using English defaults"
        );
        Self {
            is_fallback: true,
            ..Self::english()
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}

fn primary_subtag(language: &str) -> String {
    language
        .split(['-', '_'])
        .next()
        .unwrap_or(DEFAULT_LANGUAGE)
        .trim()
        .to_lowercase()
}
