pub mod frequency;
pub mod keywords;
pub mod similarity;
pub mod stopwords;

pub use frequency::TermFrequency;
pub use keywords::{DEFAULT_MIN_TOKEN_CHARS, KeywordExtractor};
pub use similarity::{SimilarityScorer, jaccard, similarity};
pub use stopwords::{DEFAULT_LANGUAGE, ENGLISH_STOP_WORDS, StopWords};
