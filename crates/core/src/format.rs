use serde::{Deserialize, Serialize};

use crate::types::{ItemFailure, ItemSummary, Transcript};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format transcript segments with timestamps
pub fn format_transcript_with_timestamps(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .filter(|seg| !seg.text.trim().is_empty())
        .map(|seg| format!("[{}] {}", format_timestamp(seg.start), seg.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Individual summaries under their own headings, separated by rules.
pub fn concatenate_summaries(items: &[ItemSummary]) -> String {
    items
        .iter()
        .map(|item| format!("## {}\n\n{}\n", item.title, item.summary.trim()))
        .collect::<Vec<_>>()
        .join("\n---\n\n")
}

pub fn format_errors_section(errors: &[ItemFailure]) -> String {
    let mut output = String::from("## Errors\n\n");
    for error in errors {
        output.push_str(&format!("- {}: {}\n", error.reference, error.message));
    }
    output
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }
}

/// Strip Markdown heading, bullet and emphasis markers for plain-text output.
pub fn markdown_to_text(markdown: &str) -> String {
    markdown
        .lines()
        .map(|line| {
            let line = line.trim_start_matches('#').trim_start();
            let line = match line.strip_prefix("* ") {
                Some(rest) => format!("• {}", rest),
                None if line == "---" => String::new(),
                None => line.to_string(),
            };
            line.replace("**", "")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Segment;

    fn item(title: &str, summary: &str) -> ItemSummary {
        ItemSummary {
            reference: title.to_string(),
            video_id: title.to_string(),
            title: title.to_string(),
            author: "someone".to_string(),
            summary: summary.to_string(),
            fallback: false,
        }
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(125.7), "02:05");
    }

    #[test]
    fn transcript_lines_skip_blank_segments() {
        let transcript = Transcript {
            language: "en".to_string(),
            segments: vec![
                Segment { start: 1.0, end: 2.0, text: "first".to_string() },
                Segment { start: 2.0, end: 3.0, text: "\n".to_string() },
                Segment { start: 61.0, end: 62.0, text: "second ".to_string() },
            ],
        };
        assert_eq!(
            format_transcript_with_timestamps(&transcript),
            "[00:01] first\n[01:01] second"
        );
    }

    #[test]
    fn concatenation_keeps_order_with_rules() {
        let text = concatenate_summaries(&[item("One", "First."), item("Two", "Second.\n")]);
        assert_eq!(text, "## One\n\nFirst.\n\n---\n\n## Two\n\nSecond.\n");
    }

    #[test]
    fn errors_section_lists_each_failure() {
        let text = format_errors_section(&[ItemFailure {
            reference: "bad-url".to_string(),
            message: "not a video".to_string(),
        }]);
        assert_eq!(text, "## Errors\n\n- bad-url: not a video\n");
    }

    #[test]
    fn plain_text_drops_markdown_markers() {
        let text = markdown_to_text("# Title\n\n* **Bold** point\n---\nPlain");
        assert_eq!(text, "Title\n\n• Bold point\n\nPlain");
    }
}
