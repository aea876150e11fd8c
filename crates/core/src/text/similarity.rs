use crate::text::{KeywordExtractor, TermFrequency};

/// Jaccard overlap of the distinct keyword sets of two texts.
///
/// Term counts are built but only presence matters: shared distinct terms over
/// the union of distinct terms. An empty union scores 0.
#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer {
    extractor: KeywordExtractor,
}

impl SimilarityScorer {
    pub fn new(extractor: KeywordExtractor) -> Self {
        Self { extractor }
    }

    pub fn score(&self, a: &str, b: &str) -> f64 {
        let tf_a = TermFrequency::from_tokens(self.extractor.extract(a));
        let tf_b = TermFrequency::from_tokens(self.extractor.extract(b));
        jaccard(&tf_a, &tf_b)
    }
}

pub fn jaccard(a: &TermFrequency, b: &TermFrequency) -> f64 {
    let common_terms = a.terms().filter(|t| b.contains(t)).count();
    let total_unique_terms = a.len() + b.len() - common_terms;

    if total_unique_terms == 0 {
        return 0.0;
    }
    common_terms as f64 / total_unique_terms as f64
}

/// Similarity with the default English extractor.
pub fn similarity(a: &str, b: &str) -> f64 {
    SimilarityScorer::default().score(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASTA: &str = "# Cooking pasta\n\nBoil water...\n\n* Use salt\n\nEnjoy your meal.";
    const ROCKET: &str =
        "# Rocket engines\n\nFuel burns...\n\n* Use liquid oxygen\n\nLaunch complete.";

    #[test]
    fn empty_texts_score_zero() {
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("the and of", "is it"), 0.0);
    }

    #[test]
    fn identical_text_scores_one() {
        let text = "Neural network training needs data";
        assert_eq!(similarity(text, text), 1.0);
    }

    #[test]
    fn score_is_symmetric_and_bounded() {
        let pairs = [
            (PASTA, ROCKET),
            ("neural network training", "network training data model"),
            ("", "something meaningful"),
        ];
        for (a, b) in pairs {
            let ab = similarity(a, b);
            let ba = similarity(b, a);
            assert_eq!(ab, ba);
            assert!((0.0..=1.0).contains(&ab));
        }
    }

    #[test]
    fn unrelated_summaries_score_near_zero() {
        // only "use" is shared across 16 distinct terms
        let score = similarity(PASTA, ROCKET);
        assert!((score - 1.0 / 16.0).abs() < 1e-9, "score = {score}");
    }

    #[test]
    fn frequency_does_not_weight_the_score() {
        // {neural, network} vs {neural, data}: 1 shared of 3 distinct terms
        let repeated = "neural neural neural network";
        assert!((similarity(repeated, "neural data") - 1.0 / 3.0).abs() < 1e-9);
        assert!((similarity("neural network", "neural data") - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn inflected_forms_are_distinct_terms() {
        assert_eq!(similarity("videos", "video"), 0.0);
    }
}
