//! Batch orchestration: fetch and summarize every item concurrently, then
//! either merge the summaries into one document (when they are related) or
//! concatenate them.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::{
    cache::{Cache, CacheKind},
    config::{AnalysisConfig, DEFAULT_MAX_CONCURRENCY},
    format::{concatenate_summaries, format_errors_section},
    merge::SummaryMerger,
    relatedness::RelatednessDecider,
    source::{ContentSource, VideoRef},
    summarize::{
        SummaryMode, SummaryOptions, SummaryRequest, Summarizer, fallback_body,
        fallback_summary,
    },
    types::{ItemFailure, ItemSummary, VideoContent},
};

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub references: Vec<String>,
    pub language: String,
    pub mode: SummaryMode,
    pub options: SummaryOptions,
    /// Skip cache reads; fresh results are still stored.
    pub force: bool,
}

impl BatchRequest {
    pub fn new(references: Vec<String>, language: impl Into<String>) -> Self {
        Self {
            references,
            language: language.into(),
            mode: SummaryMode::Summary,
            options: SummaryOptions::default(),
            force: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    ItemStarted { index: usize, reference: String },
    ItemRetrieved { index: usize, title: String, cached: bool },
    ItemFinished { index: usize, title: String, fallback: bool, cached: bool },
    ItemFailed { index: usize, reference: String, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub id: Uuid,
    /// True when the summaries were merged into one document.
    pub related: bool,
    pub document: String,
    pub items: Vec<ItemSummary>,
    pub errors: Vec<ItemFailure>,
}

pub type ProgressFn = Arc<dyn Fn(BatchEvent) + Send + Sync>;

pub struct BatchProcessor {
    source: Arc<dyn ContentSource>,
    summarizer: Arc<dyn Summarizer>,
    cache: Option<Cache>,
    analysis: AnalysisConfig,
    merger: SummaryMerger,
    max_concurrency: usize,
    progress: Option<ProgressFn>,
}

/// Per-item state moved into each spawned task.
#[derive(Clone)]
struct ItemContext {
    source: Arc<dyn ContentSource>,
    summarizer: Arc<dyn Summarizer>,
    cache: Option<Cache>,
    request: Arc<BatchRequest>,
    progress: Option<ProgressFn>,
}

impl BatchProcessor {
    pub fn new(source: Arc<dyn ContentSource>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            source,
            summarizer,
            cache: None,
            analysis: AnalysisConfig::default(),
            merger: SummaryMerger::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            progress: None,
        }
    }

    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    pub fn with_merger(mut self, merger: SummaryMerger) -> Self {
        self.merger = merger;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn on_progress(mut self, progress: impl Fn(BatchEvent) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    pub async fn run(&self, request: &BatchRequest) -> BatchReport {
        let ctx = ItemContext {
            source: Arc::clone(&self.source),
            summarizer: Arc::clone(&self.summarizer),
            cache: self.cache.clone(),
            request: Arc::new(request.clone()),
            progress: self.progress.clone(),
        };
        let permits = Arc::new(Semaphore::new(self.max_concurrency));

        let handles: Vec<_> = request
            .references
            .iter()
            .enumerate()
            .map(|(index, reference)| {
                let ctx = ctx.clone();
                let permits = Arc::clone(&permits);
                let reference = reference.clone();
                tokio::spawn(async move {
                    let _permit = permits.acquire_owned().await;
                    ctx.process(index, reference).await
                })
            })
            .collect();

        let mut items = Vec::new();
        let mut errors = Vec::new();

        for (index, handle) in handles.into_iter().enumerate() {
            let outcome = handle.await.unwrap_or_else(|e| {
                Err(ItemFailure {
                    reference: request.references[index].clone(),
                    message: format!("task failed: {}", e),
                })
            });
            match outcome {
                Ok(item) => items.push(item),
                Err(failure) => {
                    ctx.emit(BatchEvent::ItemFailed {
                        index,
                        reference: failure.reference.clone(),
                        message: failure.message.clone(),
                    });
                    errors.push(failure);
                }
            }
        }

        self.compose(items, errors)
    }

    fn compose(&self, items: Vec<ItemSummary>, errors: Vec<ItemFailure>) -> BatchReport {
        let summaries: Vec<&str> = items.iter().map(|i| i.summary.as_str()).collect();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();

        // local summaries are compared on their description text only
        let comparable: Vec<&str> = items
            .iter()
            .map(|i| {
                if i.fallback {
                    fallback_body(&i.summary)
                } else {
                    i.summary.as_str()
                }
            })
            .collect();

        let related = RelatednessDecider::from_config(&self.analysis).is_related(&comparable);
        tracing::info!(
            items = items.len(),
            errors = errors.len(),
            related,
            "Batch summaries ready"
        );

        let mut document = if related {
            match self.merger.merge(&summaries, &titles) {
                Ok(merged) => merged,
                Err(e) => {
                    tracing::warn!(error = %e, "Merge failed, concatenating instead");
                    concatenate_summaries(&items)
                }
            }
        } else {
            concatenate_summaries(&items)
        };

        if !errors.is_empty() {
            if !document.is_empty() {
                document.push('\n');
            }
            document.push_str(&format_errors_section(&errors));
        }

        BatchReport {
            id: Uuid::new_v4(),
            related,
            document,
            items,
            errors,
        }
    }
}

impl ItemContext {
    fn emit(&self, event: BatchEvent) {
        if let Some(progress) = &self.progress {
            progress(event);
        }
    }

    async fn process(&self, index: usize, reference: String) -> Result<ItemSummary, ItemFailure> {
        self.emit(BatchEvent::ItemStarted {
            index,
            reference: reference.clone(),
        });

        let video = VideoRef::parse(&reference).map_err(|e| ItemFailure {
            reference: reference.clone(),
            message: e.to_string(),
        })?;

        let (content, cached) = self.content(&video).await;
        self.emit(BatchEvent::ItemRetrieved {
            index,
            title: content.title.clone(),
            cached,
        });

        let (summary, fallback, cached) = self.summary(&content).await;
        self.emit(BatchEvent::ItemFinished {
            index,
            title: content.title.clone(),
            fallback,
            cached,
        });

        Ok(ItemSummary {
            reference,
            video_id: content.video_id,
            title: content.title,
            author: content.author,
            summary,
            fallback,
        })
    }

    async fn content(&self, video: &VideoRef) -> (VideoContent, bool) {
        let lang = &self.request.language;
        let key = Cache::key(&[video.id(), lang.as_str()]);

        if let Some(cache) = self.cached_store() {
            if let Some(content) = cache.get::<VideoContent>(CacheKind::Metadata, &key).await {
                return (content, true);
            }
        }

        let content = self.source.fetch(video, Some(lang.as_str())).await;
        if content.retrieved {
            self.store(CacheKind::Metadata, &key, &content).await;
        }
        (content, false)
    }

    async fn summary(&self, content: &VideoContent) -> (String, bool, bool) {
        let request = &self.request;
        let (kind, mode_key) = match &request.mode {
            SummaryMode::Summary => (CacheKind::Summary, "summary".to_string()),
            SummaryMode::Question(q) => (
                CacheKind::Analysis,
                format!("q:{}", q.trim().to_lowercase()),
            ),
        };
        let options_key = format!(
            "{:?}-{}",
            request.options.length, request.options.include_timestamps
        );
        let tag = self.summarizer.cache_tag();
        let key = Cache::key(&[
            content.video_id.as_str(),
            request.language.as_str(),
            tag.as_str(),
            mode_key.as_str(),
            options_key.as_str(),
        ]);

        if let Some(cache) = self.cached_store() {
            if let Some(summary) = cache.get::<String>(kind, &key).await {
                return (summary, false, true);
            }
        }

        let summary_request = SummaryRequest {
            title: content.title.clone(),
            author: content.author.clone(),
            body: content.body(),
            language: request.language.clone(),
            mode: request.mode.clone(),
            options: request.options,
        };

        match self.summarizer.summarize(&summary_request).await {
            Ok(summary) => {
                self.store(kind, &key, &summary).await;
                (summary, false, false)
            }
            Err(e) => {
                tracing::warn!(
                    video = %content.video_id,
                    error = %e,
                    "Summarizer failed, using local summary"
                );
                (fallback_summary(content), true, false)
            }
        }
    }

    /// The cache, unless reads are bypassed.
    fn cached_store(&self) -> Option<&Cache> {
        if self.request.force {
            None
        } else {
            self.cache.as_ref()
        }
    }

    async fn store<T: Serialize>(&self, kind: CacheKind, key: &str, value: &T) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(kind, key, value).await {
                tracing::warn!(error = %e, "Failed to write cache entry");
            }
        }
    }
}
