use crate::text::StopWords;

/// Tokens at or below this many characters are dropped.
pub const DEFAULT_MIN_TOKEN_CHARS: usize = 3;

/// Normalizes free text into filtered keyword tokens.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stop_words: StopWords,
    min_token_chars: usize,
}

impl KeywordExtractor {
    pub fn new(stop_words: StopWords, min_token_chars: usize) -> Self {
        Self {
            stop_words,
            min_token_chars,
        }
    }

    /// Lowercase, strip everything but letters, digits and whitespace, split on
    /// whitespace, then drop short tokens and stop words.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();

        normalized
            .split_whitespace()
            .filter(|token| token.chars().count() >= self.min_token_chars)
            .filter(|token| !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(StopWords::english(), DEFAULT_MIN_TOKEN_CHARS)
    }
}
