use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{RecapError, Result},
    provider::Provider,
    text::{DEFAULT_MIN_TOKEN_CHARS, KeywordExtractor, SimilarityScorer, StopWords},
};

pub const DEFAULT_RELATEDNESS_THRESHOLD: f64 = 0.15;
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
pub const DEFAULT_METADATA_TTL_HOURS: u64 = 7 * 24;
pub const DEFAULT_SUMMARY_TTL_HOURS: u64 = 24;

/// User settings read from `<config_dir>/recap/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub relatedness_threshold: f64,
    pub min_token_chars: usize,
    /// Stop words per language code, e.g. `{"es": ["para", "como"]}`.
    pub stop_words: HashMap<String, Vec<String>>,
    pub max_concurrency: usize,
    pub metadata_ttl_hours: u64,
    pub summary_ttl_hours: u64,
    pub cache_dir: Option<PathBuf>,
    /// Model per provider slug, e.g. `{"openai": "gpt-5"}`.
    pub models: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            relatedness_threshold: DEFAULT_RELATEDNESS_THRESHOLD,
            min_token_chars: DEFAULT_MIN_TOKEN_CHARS,
            stop_words: HashMap::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            metadata_ttl_hours: DEFAULT_METADATA_TTL_HOURS,
            summary_ttl_hours: DEFAULT_SUMMARY_TTL_HOURS,
            cache_dir: None,
            models: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recap")
            .join("config.json")
    }

    /// Load settings from the default location, or defaults if there is no file.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings =
            serde_json::from_str(&content).map_err(|e| RecapError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if !(0.0..=1.0).contains(&settings.relatedness_threshold) {
            return Err(RecapError::Config {
                path: path.to_path_buf(),
                reason: format!(
                    "relatedness_threshold must be within [0, 1], got {}",
                    settings.relatedness_threshold
                ),
            });
        }

        Ok(settings)
    }

    pub fn metadata_ttl(&self) -> Duration {
        hours(self.metadata_ttl_hours)
    }

    pub fn summary_ttl(&self) -> Duration {
        hours(self.summary_ttl_hours)
    }

    /// Configured model for a provider, if any.
    pub fn model_for(&self, provider: Provider) -> Option<&str> {
        self.models.get(provider.slug()).map(String::as_str)
    }

    pub fn analysis_for(&self, language: &str) -> AnalysisConfig {
        AnalysisConfig::for_language(language, self)
    }
}

fn hours(h: u64) -> Duration {
    Duration::from_secs(h.saturating_mul(3600))
}

/// Parameters of the relatedness and merge analysis.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub threshold: f64,
    pub stop_words: StopWords,
    pub min_token_chars: usize,
}

impl AnalysisConfig {
    pub fn for_language(language: &str, settings: &Settings) -> Self {
        Self {
            threshold: settings.relatedness_threshold,
            stop_words: StopWords::for_language(language, &settings.stop_words),
            min_token_chars: settings.min_token_chars,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn extractor(&self) -> KeywordExtractor {
        KeywordExtractor::new(self.stop_words.clone(), self.min_token_chars)
    }

    pub fn scorer(&self) -> SimilarityScorer {
        SimilarityScorer::new(self.extractor())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RELATEDNESS_THRESHOLD,
            stop_words: StopWords::english(),
            min_token_chars: DEFAULT_MIN_TOKEN_CHARS,
        }
    }
}
