use async_trait::async_trait;
use tokio::process::Command;

use crate::{
    error::{RecapError, Result},
    source::{
        ContentSource, VideoRef,
        captions::{YtDlpInfo, parse_json3},
    },
    types::VideoContent,
};

/// Retrieves metadata with `yt-dlp` and captions over HTTP.
pub struct YtDlpSource {
    binary: String,
    client: reqwest::Client,
}

impl YtDlpSource {
    pub fn new() -> Self {
        Self::with_binary("yt-dlp")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn load_info(&self, video: &VideoRef) -> Result<YtDlpInfo> {
        let output = Command::new(&self.binary)
            .arg(video.watch_url())
            .arg("-J")
            .arg("--skip-download")
            .arg("--no-warnings")
            .arg("--extractor-args")
            .arg("youtube:player_client=android,web")
            .output()
            .await?;

        if !output.status.success() {
            return Err(RecapError::RetrievalFailed {
                video_id: video.id().to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn try_fetch(&self, video: &VideoRef, lang_hint: Option<&str>) -> Result<VideoContent> {
        let info = self.load_info(video).await?;

        let transcript = match info.caption_track(lang_hint) {
            Some(track) => {
                let body = self
                    .client
                    .get(&track.url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                match parse_json3(&body, &track.language) {
                    Ok(transcript) => Some(transcript),
                    Err(e) => {
                        tracing::warn!(video = %video, error = %e, "Unreadable caption track");
                        None
                    }
                }
            }
            None => {
                tracing::info!(video = %video, "No captions available, using description");
                None
            }
        };

        Ok(VideoContent {
            video_id: info.id,
            title: info.title.unwrap_or_else(|| format!("Video {}", video.id())),
            author: info
                .channel
                .or(info.uploader)
                .unwrap_or_else(|| "Unknown channel".to_string()),
            description: info.description.unwrap_or_default(),
            duration_seconds: info.duration,
            transcript,
            retrieved: true,
        })
    }
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentSource for YtDlpSource {
    async fn fetch(&self, video: &VideoRef, lang_hint: Option<&str>) -> VideoContent {
        match self.try_fetch(video, lang_hint).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(video = %video, error = %e, "Retrieval failed, using placeholder");
                VideoContent::fallback(video.id())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_degrades_to_placeholder() {
        let source = YtDlpSource::with_binary("/nonexistent/recap-yt-dlp");
        let video = VideoRef::parse("dQw4w9WgXcQ").unwrap();

        let content = source.fetch(&video, Some("en")).await;
        assert!(!content.retrieved);
        assert_eq!(content.title, "Video dQw4w9WgXcQ");
        assert!(content.body().is_empty());
    }
}
