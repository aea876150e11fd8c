use async_trait::async_trait;

use crate::{
    error::{RecapError, Result},
    summarize::{SummaryRequest, Summarizer},
    types::VideoContent,
};

const MAX_KEY_POINTS: usize = 3;

/// Local summary built only from the item's own title and description.
///
/// Layout: bold title with the first sentence, the following sentences as
/// `* ` points, and the last sentence as the closing paragraph.
pub fn fallback_summary(content: &VideoContent) -> String {
    let sentences = description_sentences(&content.description, usize::MAX);

    let mut output = format!("**{}**\n", content.title.trim());
    let Some((first, rest)) = sentences.split_first() else {
        return output;
    };
    output.push_str(first);
    output.push('\n');

    if let Some((last, middle)) = rest.split_last() {
        if !middle.is_empty() {
            output.push('\n');
            for point in middle.iter().take(MAX_KEY_POINTS) {
                output.push_str(&format!("* {}\n", point));
            }
        }
        output.push('\n');
        output.push_str(last);
        output.push('\n');
    }
    output
}

/// Description-derived part of a local summary, without the title line.
pub fn fallback_body(summary: &str) -> &str {
    match summary.split_once('\n') {
        Some((title, rest)) if title.starts_with("**") => rest,
        _ => summary,
    }
}

/// Never calls a model, so every item gets the local summary.
pub struct OfflineSummarizer;

#[async_trait]
impl Summarizer for OfflineSummarizer {
    async fn summarize(&self, _request: &SummaryRequest) -> Result<String> {
        Err(RecapError::SummaryFailed {
            reason: "offline mode".to_string(),
        })
    }

    fn cache_tag(&self) -> String {
        "offline".to_string()
    }
}

/// First `limit` sentences of a description, skipping link and hashtag lines.
pub fn description_sentences(description: &str, limit: usize) -> Vec<String> {
    let prose = description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.contains("http://") && !line.contains("https://"))
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ");

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = prose.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let at_boundary = matches!(c, '.' | '!' | '?')
            && chars.peek().is_none_or(|next| next.is_whitespace());
        if at_boundary {
            let sentence = current.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
            if sentences.len() == limit {
                return sentences;
            }
        }
    }

    let rest = current.trim();
    if !rest.is_empty() && sentences.len() < limit {
        sentences.push(rest.to_string());
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{merge::SummaryFragments, text::similarity};

    #[test]
    fn takes_first_three_sentences() {
        let sentences = description_sentences(
            "We build a parser. It handles v1.2 input! Why? Because.\nMore text",
            3,
        );
        assert_eq!(sentences, vec!["We build a parser.", "It handles v1.2 input!", "Why?"]);
    }

    #[test]
    fn skips_links_and_hashtags() {
        let sentences = description_sentences(
            "Follow me: https://example.com\n#rust #programming\nA calm intro to async",
            3,
        );
        assert_eq!(sentences, vec!["A calm intro to async"]);
    }

    #[test]
    fn placeholder_summary_is_only_the_title() {
        let content = VideoContent::fallback("dQw4w9WgXcQ");
        let summary = fallback_summary(&content);

        assert_eq!(summary, "**Video dQw4w9WgXcQ**\n");
        assert_eq!(fallback_body(&summary), "");
    }

    #[test]
    fn description_fills_overview_points_and_conclusion() {
        let mut content = VideoContent::fallback("abc");
        content.title = "Rocket engines".to_string();
        content.description = "Liquid oxygen burns kerosene. Turbopumps feed the chamber. \
            The nozzle shapes the exhaust. Staging drops dead weight. Orbit needs speed above all."
            .to_string();
        let summary = fallback_summary(&content);

        let fragments = SummaryFragments::extract(&summary);
        assert_eq!(
            fragments.overview.as_deref(),
            Some("**Rocket engines**\nLiquid oxygen burns kerosene.")
        );
        assert_eq!(
            fragments.bullets,
            vec![
                "* Turbopumps feed the chamber.",
                "* The nozzle shapes the exhaust.",
                "* Staging drops dead weight.",
            ]
        );
        assert_eq!(fragments.conclusion.as_deref(), Some("Orbit needs speed above all."));
    }

    #[test]
    fn unrelated_local_summaries_share_no_keywords() {
        let mut pasta = VideoContent::fallback("pasta");
        pasta.title = "Cooking pasta".to_string();
        pasta.description =
            "Boil water and cook spaghetti with garlic. Toss it in olive oil. Serve with parmesan."
                .to_string();
        let mut rocket = VideoContent::fallback("rocket");
        rocket.title = "Rocket engines".to_string();
        rocket.description =
            "Liquid oxygen burns kerosene in the chamber. Turbopumps feed the engine.".to_string();

        let pasta = fallback_summary(&pasta);
        let rocket = fallback_summary(&rocket);
        assert_eq!(similarity(fallback_body(&pasta), fallback_body(&rocket)), 0.0);
        assert_eq!(similarity(&pasta, &rocket), 0.0);
    }
}
