pub mod fallback;
pub mod llm;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use fallback::{OfflineSummarizer, fallback_body, fallback_summary};
pub use llm::LlmSummarizer;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMode {
    Summary,
    /// Answer a targeted question about the video.
    Question(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Brief,
    #[default]
    Standard,
    Detailed,
}

impl SummaryLength {
    pub fn bullet_range(&self) -> &'static str {
        match self {
            SummaryLength::Brief => "3-4",
            SummaryLength::Standard => "5-7",
            SummaryLength::Detailed => "8-12",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummaryOptions {
    pub length: SummaryLength,
    /// Ask for `[MM:SS]` references in the bullets.
    pub include_timestamps: bool,
}

/// Everything a summarizer needs for one video.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub title: String,
    pub author: String,
    pub body: String,
    pub language: String,
    pub mode: SummaryMode,
    pub options: SummaryOptions,
}

/// Produces a Markdown summary or answer for one video.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String>;

    /// Identifies the generator in cache keys.
    fn cache_tag(&self) -> String;
}
