//! Merging of related per-video summaries into one composite document.
//!
//! Each summary is expected to follow the Markdown layout the summarizer asks
//! for: an overview paragraph first, `* ` bullet lines, and a closing
//! paragraph. Summaries that don't follow it simply contribute fewer fragments.

use crate::error::{RecapError, Result};

pub const MERGED_TITLE: &str = "Combined Summary of Related Videos";
pub const DEFAULT_FALLBACK_OVERVIEW: &str =
    "These videos explore a common subject from several perspectives.";
pub const DEFAULT_FALLBACK_CONCLUSION: &str =
    "Taken together, these videos give a broader picture of the shared topic.";

const BULLET_MARKER: &str = "* ";
const DEDUP_PREFIX_WORDS: usize = 5;
const MIN_CONCLUSION_CHARS: usize = 10;
const CONCLUSION_WINDOW: usize = 2;

/// Structural pieces pulled out of a single summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryFragments {
    pub overview: Option<String>,
    pub bullets: Vec<String>,
    pub conclusion: Option<String>,
}

impl SummaryFragments {
    pub fn extract(summary: &str) -> Self {
        let paragraphs = paragraphs(summary);

        let overview = paragraphs.iter().find(|p| !p.is_empty()).cloned();

        let bullets = summary
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| line.starts_with(BULLET_MARKER))
            .map(str::to_string)
            .collect();

        let tail = paragraphs.len().saturating_sub(CONCLUSION_WINDOW);
        let conclusion = paragraphs[tail..]
            .iter()
            .find(|p| !p.starts_with(BULLET_MARKER) && p.chars().count() > MIN_CONCLUSION_CHARS)
            .cloned();

        Self {
            overview,
            bullets,
            conclusion,
        }
    }
}

/// Pieces between `\n\n` separators, trimmed. Empty pieces are kept so a
/// trailing separator still occupies a slot at the end.
fn paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(|p| p.trim().to_string())
        .collect()
}

/// Longest fragment by character count; the earliest wins ties.
fn longest(fragments: &[String]) -> Option<&String> {
    let mut sorted: Vec<&String> = fragments.iter().collect();
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    sorted.first().copied()
}

fn bullet_prefix(bullet: &str) -> String {
    bullet
        .split_whitespace()
        .take(DEDUP_PREFIX_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Drop bullets whose five-word prefix contains, or is contained in, the
/// prefix of a bullet already kept. The marker counts as the first word.
pub fn dedup_bullets(bullets: &[String]) -> Vec<String> {
    let mut accepted: Vec<(String, &String)> = Vec::new();

    for bullet in bullets {
        let prefix = bullet_prefix(bullet);
        let duplicate = accepted
            .iter()
            .any(|(kept, _)| prefix.contains(kept.as_str()) || kept.contains(prefix.as_str()));
        if !duplicate {
            accepted.push((prefix, bullet));
        }
    }

    accepted.into_iter().map(|(_, b)| b.clone()).collect()
}

/// Builds the combined document for a related batch.
#[derive(Debug, Clone)]
pub struct SummaryMerger {
    fallback_overview: String,
    fallback_conclusion: String,
}

impl SummaryMerger {
    pub fn new(fallback_overview: impl Into<String>, fallback_conclusion: impl Into<String>) -> Self {
        Self {
            fallback_overview: fallback_overview.into(),
            fallback_conclusion: fallback_conclusion.into(),
        }
    }

    /// Merge index-aligned summaries and titles. Fails if the counts differ.
    pub fn merge<S, T>(&self, summaries: &[S], titles: &[T]) -> Result<String>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        if summaries.len() != titles.len() {
            return Err(RecapError::TitleCountMismatch {
                summaries: summaries.len(),
                titles: titles.len(),
            });
        }

        let mut overviews = Vec::new();
        let mut bullets = Vec::new();
        let mut conclusions = Vec::new();

        for summary in summaries {
            let fragments = SummaryFragments::extract(summary.as_ref());
            overviews.extend(fragments.overview);
            bullets.extend(fragments.bullets);
            conclusions.extend(fragments.conclusion);
        }

        let key_points = dedup_bullets(&bullets);
        tracing::debug!(
            summaries = summaries.len(),
            bullets = bullets.len(),
            kept = key_points.len(),
            "Merging related summaries"
        );

        let mut output = String::new();
        output.push_str(&format!("# {}\n\n", MERGED_TITLE));

        output.push_str("## Videos Analyzed\n\n");
        for (i, title) in titles.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, title.as_ref()));
        }
        output.push('\n');

        output.push_str("## Overview\n\n");
        output.push_str(longest(&overviews).unwrap_or(&self.fallback_overview));
        output.push_str("\n\n");

        output.push_str("## Key Points From All Videos\n\n");
        for point in &key_points {
            output.push_str(point);
            output.push('\n');
        }
        output.push('\n');

        output.push_str("## Overall Conclusion\n\n");
        output.push_str(longest(&conclusions).unwrap_or(&self.fallback_conclusion));
        output.push('\n');

        Ok(output)
    }
}

impl Default for SummaryMerger {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_OVERVIEW, DEFAULT_FALLBACK_CONCLUSION)
    }
}

pub fn merge<S: AsRef<str>, T: AsRef<str>>(summaries: &[S], titles: &[T]) -> Result<String> {
    SummaryMerger::default().merge(summaries, titles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTIONS: [&str; 5] = [
        MERGED_TITLE,
        "Videos Analyzed",
        "Overview",
        "Key Points From All Videos",
        "Overall Conclusion",
    ];

    #[test]
    fn extracts_overview_bullets_and_conclusion() {
        let summary = "Rust ownership in ten minutes.\nWith examples.\n\n\
            * Moves transfer ownership\n* Borrows are checked\n\n\
            Ownership makes memory safety cheap.";
        let f = SummaryFragments::extract(summary);

        assert_eq!(
            f.overview.as_deref(),
            Some("Rust ownership in ten minutes.\nWith examples.")
        );
        assert_eq!(f.bullets, vec!["* Moves transfer ownership", "* Borrows are checked"]);
        assert_eq!(f.conclusion.as_deref(), Some("Ownership makes memory safety cheap."));
    }

    #[test]
    fn conclusion_only_looks_at_last_two_paragraphs() {
        // third-from-last paragraph is long but outside the window
        let summary = "Intro paragraph that is long enough.\n\n\
            * point one\n\nShort end";
        let f = SummaryFragments::extract(summary);
        assert_eq!(f.conclusion, None);
    }

    #[test]
    fn trailing_separator_counts_as_last_paragraph() {
        let summary = "Overview.\n\nFirst closing paragraph long.\n\n\
            Second closing paragraph longer!\n\n";
        let f = SummaryFragments::extract(summary);
        assert_eq!(f.conclusion.as_deref(), Some("Second closing paragraph longer!"));
    }

    #[test]
    fn leading_separator_is_skipped_for_overview() {
        let f = SummaryFragments::extract("\n\nActual overview.\n\n* point");
        assert_eq!(f.overview.as_deref(), Some("Actual overview."));
    }

    #[test]
    fn conclusion_scans_window_forward() {
        let summary = "Overview.\n\nA long closing thought here.\n\nAnother long final remark.";
        let f = SummaryFragments::extract(summary);
        assert_eq!(f.conclusion.as_deref(), Some("A long closing thought here."));
    }

    #[test]
    fn indented_bullets_are_not_captured() {
        let f = SummaryFragments::extract("Overview\n\n  * nested\n- dash\n* top level");
        assert_eq!(f.bullets, vec!["* top level"]);
    }

    #[test]
    fn text_without_blank_lines_is_one_paragraph() {
        let f = SummaryFragments::extract("Just one line of summary text");
        assert_eq!(f.overview.as_deref(), Some("Just one line of summary text"));
        assert_eq!(f.conclusion.as_deref(), Some("Just one line of summary text"));
        assert!(f.bullets.is_empty());
    }

    #[test]
    fn empty_summary_has_no_fragments() {
        assert_eq!(SummaryFragments::extract(""), SummaryFragments::default());
        assert_eq!(SummaryFragments::extract("\n\n  \n"), SummaryFragments::default());
    }

    #[test]
    fn dedup_drops_identical_bullets() {
        let merged = merge(
            &[
                "Overview one.\n\n* Uses blockchain for security\n\nConclusion one here.",
                "Overview two.\n\n* Uses blockchain for security\n\nConclusion two here.",
            ],
            &["First", "Second"],
        )
        .unwrap();
        assert_eq!(merged.matches("* Uses blockchain for security").count(), 1);
    }

    #[test]
    fn dedup_uses_prefix_containment_both_ways() {
        let bullets: Vec<String> = [
            "* Uses blockchain for security and audits",
            "* uses blockchain",
            "* Uses blockchain for security reasons too",
            "* Stores keys offline",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let kept = dedup_bullets(&bullets);
        assert_eq!(
            kept,
            vec!["* Uses blockchain for security and audits", "* Stores keys offline"]
        );
    }

    #[test]
    fn dedup_keeps_short_bullet_first_seen() {
        let bullets: Vec<String> = ["* Rust", "* Rust is fast"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(dedup_bullets(&bullets), vec!["* Rust"]);
    }

    #[test]
    fn merge_layout() {
        let merged = merge(
            &[
                "Short overview.\n\n* Point A\n\nFirst conclusion text.",
                "A much longer overview paragraph.\n\n* Point B\n\nSecond, longer conclusion text.",
            ],
            &["Video A", "Video B"],
        )
        .unwrap();

        let expected = "# Combined Summary of Related Videos\n\n\
            ## Videos Analyzed\n\n1. Video A\n2. Video B\n\n\
            ## Overview\n\nA much longer overview paragraph.\n\n\
            ## Key Points From All Videos\n\n* Point A\n* Point B\n\n\
            ## Overall Conclusion\n\nSecond, longer conclusion text.\n";
        assert_eq!(merged, expected);
    }

    #[test]
    fn longest_tie_keeps_first_collected() {
        let merged = merge(&["AAAA overview", "BBBB overview"], &["A", "B"]).unwrap();
        assert!(merged.contains("## Overview\n\nAAAA overview\n"));
        assert!(merged.contains("## Overall Conclusion\n\nAAAA overview\n"));
    }

    #[test]
    fn empty_summaries_fall_back_to_generic_sentences() {
        let merged = merge(&["", ""], &["A", "B"]).unwrap();
        for section in SECTIONS {
            assert!(merged.contains(section), "missing {section}");
        }
        assert!(merged.contains(DEFAULT_FALLBACK_OVERVIEW));
        assert!(merged.contains(DEFAULT_FALLBACK_CONCLUSION));
    }

    #[test]
    fn custom_fallbacks_are_used() {
        let merger = SummaryMerger::new("Resumen general.", "Conclusión general.");
        let merged = merger.merge(&[""], &["Uno"]).unwrap();
        assert!(merged.contains("Resumen general."));
        assert!(merged.contains("Conclusión general."));
    }

    #[test]
    fn mismatched_titles_fail_fast() {
        let err = merge(&["a", "b"], &["only one"]).unwrap_err();
        assert!(matches!(
            err,
            RecapError::TitleCountMismatch {
                summaries: 2,
                titles: 1
            }
        ));
    }

    #[test]
    fn merge_is_deterministic() {
        let summaries = ["Neural nets.\n\n* Train it\n\nDone training now.", "Other.\n\n* Test it"];
        let titles = ["One", "Two"];
        assert_eq!(
            merge(&summaries, &titles).unwrap(),
            merge(&summaries, &titles).unwrap()
        );
    }
}
