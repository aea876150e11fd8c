use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecapError {
    #[error("Invalid video reference {input:?}: {reason}")]
    InvalidReference { input: String, reason: String },

    #[error("Metadata retrieval failed for {video_id}: {reason}")]
    RetrievalFailed { video_id: String, reason: String },

    #[error("Summary generation failed: {reason}")]
    SummaryFailed { reason: String },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("Cannot merge {summaries} summaries with {titles} titles")]
    TitleCountMismatch { summaries: usize, titles: usize },

    #[error("Invalid config at {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("Cache error at {path}: {reason}")]
    Cache { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, RecapError>;
