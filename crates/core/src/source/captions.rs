use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    error::Result,
    text::DEFAULT_LANGUAGE,
    types::{Segment, Transcript},
};

/// The subset of `yt-dlp -J` output we use.
#[derive(Debug, Deserialize)]
pub struct YtDlpInfo {
    pub id: String,
    pub title: Option<String>,
    pub channel: Option<String>,
    pub uploader: Option<String>,
    pub description: Option<String>,
    pub duration: Option<f64>,
    pub language: Option<String>,
    #[serde(default)]
    pub subtitles: HashMap<String, Vec<CaptionFormat>>,
    #[serde(default)]
    pub automatic_captions: HashMap<String, Vec<CaptionFormat>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionFormat {
    pub ext: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub language: String,
    pub url: String,
    pub automatic: bool,
}

impl YtDlpInfo {
    /// Pick a json3 caption track. Uploaded subtitles beat automatic captions;
    /// within each, the hint language, then English, then the video's own
    /// language, then whatever sorts first.
    pub fn caption_track(&self, lang_hint: Option<&str>) -> Option<CaptionTrack> {
        let mut wanted: Vec<String> = Vec::new();
        if let Some(hint) = lang_hint {
            wanted.push(hint.to_lowercase());
        }
        wanted.push(DEFAULT_LANGUAGE.to_string());
        if let Some(lang) = &self.language {
            wanted.push(lang.to_lowercase());
        }

        for (pool, automatic) in [(&self.subtitles, false), (&self.automatic_captions, true)] {
            if let Some(track) = pick_from(pool, &wanted, automatic) {
                return Some(track);
            }
        }
        None
    }
}

fn pick_from(
    pool: &HashMap<String, Vec<CaptionFormat>>,
    wanted: &[String],
    automatic: bool,
) -> Option<CaptionTrack> {
    let mut keys: Vec<&String> = pool.keys().collect();
    keys.sort();

    let json3 = |key: &String| {
        pool.get(key)?
            .iter()
            .find(|f| f.ext == "json3")
            .map(|f| CaptionTrack {
                language: key.clone(),
                url: f.url.clone(),
                automatic,
            })
    };

    for lang in wanted {
        let prefix = format!("{}-", lang);
        let matched = keys
            .iter()
            .filter(|k| k.to_lowercase() == *lang || k.to_lowercase().starts_with(&prefix))
            .find_map(|k| json3(*k));
        if matched.is_some() {
            return matched;
        }
    }

    // automatic captions list every translation target; only fall through to
    // an arbitrary language for uploaded subtitles
    if automatic {
        return None;
    }
    keys.iter().find_map(|k| json3(*k))
}

#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    t_start_ms: Option<u64>,
    d_duration_ms: Option<u64>,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a YouTube `json3` caption document into transcript segments.
pub fn parse_json3(body: &str, language: &str) -> Result<Transcript> {
    let doc: Json3 = serde_json::from_str(body)?;

    let segments = doc
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }
            let start = event.t_start_ms.unwrap_or(0) as f64 / 1000.0;
            let end = start + event.d_duration_ms.unwrap_or(0) as f64 / 1000.0;
            Some(Segment { start, end, text })
        })
        .collect();

    Ok(Transcript {
        segments,
        language: language.to_string(),
    })
}
