use serde::{Deserialize, Serialize};

use crate::format::format_transcript_with_timestamps;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transcript {
    pub segments: Vec<Segment>,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Transcript {
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.text.trim().is_empty())
    }
}

/// Metadata and transcript retrieved for one video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoContent {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub duration_seconds: Option<f64>,
    pub transcript: Option<Transcript>,
    /// False when retrieval failed and this is a placeholder.
    pub retrieved: bool,
}

impl VideoContent {
    pub fn fallback(video_id: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            title: format!("Video {}", video_id),
            author: "Unknown channel".to_string(),
            description: String::new(),
            duration_seconds: None,
            transcript: None,
            retrieved: false,
        }
    }

    /// Text handed to the summarizer: the time-coded transcript when there is
    /// one, the description otherwise.
    pub fn body(&self) -> String {
        match &self.transcript {
            Some(transcript) if !transcript.is_empty() => {
                format_transcript_with_timestamps(transcript)
            }
            _ => self.description.trim().to_string(),
        }
    }

    pub fn has_transcript(&self) -> bool {
        self.transcript.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// A summary produced for one item of a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSummary {
    pub reference: String,
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub summary: String,
    /// True when the local rule-based summary replaced the model output.
    pub fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemFailure {
    pub reference: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_prefers_transcript() {
        let mut content = VideoContent::fallback("abc");
        content.description = "  A description.  ".to_string();
        assert_eq!(content.body(), "A description.");

        content.transcript = Some(Transcript {
            language: "en".to_string(),
            segments: vec![Segment {
                start: 65.0,
                end: 70.0,
                text: " hello ".to_string(),
            }],
        });
        assert!(content.has_transcript());
        assert_eq!(content.body(), "[01:05] hello");
    }

    #[test]
    fn blank_transcript_falls_back_to_description() {
        let mut content = VideoContent::fallback("abc");
        content.description = "desc".to_string();
        content.transcript = Some(Transcript {
            language: "en".to_string(),
            segments: vec![Segment {
                start: 0.0,
                end: 1.0,
                text: "  ".to_string(),
            }],
        });
        assert!(!content.has_transcript());
        assert_eq!(content.body(), "desc");
    }
}
