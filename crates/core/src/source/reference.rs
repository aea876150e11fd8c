use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RecapError, Result};

const VIDEO_ID_LEN: usize = 11;

/// A YouTube video identified by its 11-character id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoRef {
    id: String,
}

impl VideoRef {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if is_video_id(input) {
            return Ok(Self { id: input.to_string() });
        }

        let with_scheme = if input.contains("://") {
            input.to_string()
        } else {
            format!("https://{}", input)
        };
        let url = Url::parse(&with_scheme).map_err(|e| invalid(input, &e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| invalid(input, "missing host"))?
            .trim_start_matches("www.")
            .trim_start_matches("m.")
            .trim_start_matches("music.");

        let candidate = match host {
            "youtu.be" => url.path_segments().and_then(|mut s| s.next()).map(str::to_string),
            "youtube.com" | "youtube-nocookie.com" => {
                let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
                match segments.as_slice() {
                    ["watch", ..] => url
                        .query_pairs()
                        .find(|(k, _)| k == "v")
                        .map(|(_, v)| v.into_owned()),
                    ["shorts" | "embed" | "live" | "v", id, ..] => Some(id.to_string()),
                    _ => None,
                }
            }
            _ => return Err(invalid(input, "not a YouTube URL")),
        };

        match candidate {
            Some(id) if is_video_id(&id) => Ok(Self { id }),
            _ => Err(invalid(input, "no video id found")),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

fn is_video_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn invalid(input: &str, reason: &str) -> RecapError {
    RecapError::InvalidReference {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_url_shapes() {
        let inputs = [
            "dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42",
            "youtube.com/watch?v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ",
        ];
        for input in inputs {
            let video = VideoRef::parse(input).unwrap_or_else(|e| panic!("{input}: {e}"));
            assert_eq!(video.id(), "dQw4w9WgXcQ");
        }
    }

    #[test]
    fn rejects_non_video_input() {
        for input in [
            "",
            "not a url",
            "https://vimeo.com/123456",
            "https://www.youtube.com/channel/UC123",
            "https://www.youtube.com/watch?v=short",
        ] {
            assert!(
                matches!(VideoRef::parse(input), Err(RecapError::InvalidReference { .. })),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn watch_url_is_canonical() {
        let video = VideoRef::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(video.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
