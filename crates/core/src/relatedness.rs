use crate::{config::AnalysisConfig, text::SimilarityScorer};

/// Decides whether a batch of summaries discusses a shared topic.
#[derive(Debug, Clone)]
pub struct RelatednessDecider {
    scorer: SimilarityScorer,
    threshold: f64,
}

impl RelatednessDecider {
    pub fn new(scorer: SimilarityScorer, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.scorer(), config.threshold)
    }

    /// True as soon as any unordered pair scores at or above the threshold.
    /// Batches with fewer than two summaries are never related.
    pub fn is_related<S: AsRef<str>>(&self, summaries: &[S]) -> bool {
        if summaries.len() < 2 {
            return false;
        }

        for i in 0..summaries.len() {
            for j in (i + 1)..summaries.len() {
                let score = self.scorer.score(summaries[i].as_ref(), summaries[j].as_ref());
                tracing::debug!(i, j, score, threshold = self.threshold, "Pair similarity");
                if score >= self.threshold {
                    return true;
                }
            }
        }
        false
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for RelatednessDecider {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

/// Relatedness with the default English extractor.
pub fn relatedness<S: AsRef<str>>(summaries: &[S], threshold: f64) -> bool {
    RelatednessDecider::new(SimilarityScorer::default(), threshold).is_related(summaries)
}
