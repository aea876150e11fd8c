//! Recap Core Library
//!
//! Summaries of YouTube videos, lexical relatedness detection across a batch
//! of summaries, and merging of related summaries into one document.

pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod merge;
pub mod provider;
pub mod relatedness;
pub mod source;
pub mod summarize;
pub mod text;
pub mod types;

// Re-export commonly used items at crate root
pub use batch::{BatchEvent, BatchProcessor, BatchReport, BatchRequest};
pub use cache::{Cache, CacheKind, CacheTtl, get_root_cache_dir};
pub use config::{AnalysisConfig, DEFAULT_RELATEDNESS_THRESHOLD, Settings};
pub use error::{RecapError, Result};
pub use format::{
    OutputFormat, concatenate_summaries, format_timestamp, format_transcript_with_timestamps,
    markdown_to_text,
};
pub use merge::{SummaryFragments, SummaryMerger, merge};
pub use provider::Provider;
pub use relatedness::{RelatednessDecider, relatedness};
pub use source::{ContentSource, VideoRef, YtDlpSource};
pub use summarize::{
    LlmSummarizer, OfflineSummarizer, Summarizer, SummaryLength, SummaryMode, SummaryOptions,
    SummaryRequest, fallback_body, fallback_summary,
};
pub use text::{KeywordExtractor, SimilarityScorer, StopWords, TermFrequency, similarity};
pub use types::{ItemFailure, ItemSummary, Segment, Transcript, VideoContent};
