use async_trait::async_trait;

use crate::{
    error::{RecapError, Result},
    provider::Provider,
    summarize::{SummaryMode, SummaryRequest, Summarizer},
};

/// Maximum body characters sent to the model.
const MAX_BODY_CHARS: usize = 120_000;

/// Summaries from an OpenAI-compatible chat completion endpoint.
pub struct LlmSummarizer {
    provider: Provider,
    model: String,
    client: reqwest::Client,
}

impl LlmSummarizer {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

pub fn system_prompt(request: &SummaryRequest) -> String {
    let task = match &request.mode {
        SummaryMode::Summary => "Summarize the video for someone who has not watched it.".to_string(),
        SummaryMode::Question(question) => format!(
            "Answer this question using only what the video says: {}\n\
             If the video does not answer it, say so plainly.",
            question.trim()
        ),
    };
    let timestamps = if request.options.include_timestamps {
        "- Start each bullet with the [MM:SS] timestamp it refers to, after the \"* \" marker"
    } else {
        "- Do not include timestamps"
    };

    format!(
        r#"You are a video content analyst. {task}

IMPORTANT: Write ALL text in {lang} language.

Output Markdown with exactly this layout and nothing else:
1. One overview paragraph (no heading before it)
2. A blank line, then {bullets} key points, one per line, each starting with "* "
3. A blank line, then one concluding paragraph

Rules:
{timestamps}
- Do not use headings, numbered lists or nested bullets
- Output ONLY the Markdown, no preamble"#,
        task = task,
        lang = request.language,
        bullets = request.options.length.bullet_range(),
        timestamps = timestamps,
    )
}

pub fn user_prompt(request: &SummaryRequest) -> String {
    let body: String = request.body.chars().take(MAX_BODY_CHARS).collect();
    format!(
        "Video: \"{}\" by {}\n\nContent:\n{}",
        request.title, request.author, body
    )
}

/// Pull the message text out of a chat completion response.
pub fn extract_content(response: &serde_json::Value) -> Result<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RecapError::SummaryFailed {
            reason: format!("Invalid API response: {}", response),
        })
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        if request.body.trim().is_empty() {
            return Err(RecapError::SummaryFailed {
                reason: "nothing to summarize".to_string(),
            });
        }

        let api_key = self.provider.validate_api_key()?;

        let response = self
            .client
            .post(self.provider.endpoint())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "system",
                        "content": system_prompt(request),
                    },
                    {
                        "role": "user",
                        "content": user_prompt(request),
                    },
                ],
                "temperature": 0.3,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        extract_content(&response)
    }

    fn cache_tag(&self) -> String {
        format!("{}-{}", self.provider.slug(), self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::{SummaryLength, SummaryOptions};

    fn request(mode: SummaryMode) -> SummaryRequest {
        SummaryRequest {
            title: "Intro to Rust".to_string(),
            author: "Rustacean".to_string(),
            body: "[00:00] hello".to_string(),
            language: "es".to_string(),
            mode,
            options: SummaryOptions {
                length: SummaryLength::Brief,
                include_timestamps: true,
            },
        }
    }

    #[test]
    fn cache_tag_follows_the_model() {
        let default = LlmSummarizer::new(Provider::Openai);
        assert_eq!(default.cache_tag(), "openai-gpt-5-mini");

        let custom = LlmSummarizer::new(Provider::Openai).with_model("gpt-5");
        assert_eq!(custom.cache_tag(), "openai-gpt-5");
    }

    #[test]
    fn system_prompt_pins_layout_and_language() {
        let prompt = system_prompt(&request(SummaryMode::Summary));
        assert!(prompt.contains("in es language"));
        assert!(prompt.contains("3-4 key points"));
        assert!(prompt.contains("starting with \"* \""));
        assert!(prompt.contains("[MM:SS]"));
    }

    #[test]
    fn question_mode_carries_the_question() {
        let prompt = system_prompt(&request(SummaryMode::Question(
            " Does it cover lifetimes? ".to_string(),
        )));
        assert!(prompt.contains("Answer this question using only what the video says: Does it cover lifetimes?"));
    }

    #[test]
    fn user_prompt_names_the_video() {
        let prompt = user_prompt(&request(SummaryMode::Summary));
        assert!(prompt.starts_with("Video: \"Intro to Rust\" by Rustacean"));
        assert!(prompt.ends_with("[00:00] hello"));
    }

    #[test]
    fn extracts_message_content() {
        let response = serde_json::json!({
            "choices": [{"message": {"content": "  Overview.\n\n* point  "}}]
        });
        assert_eq!(extract_content(&response).unwrap(), "Overview.\n\n* point");
    }

    #[test]
    fn malformed_response_is_an_error() {
        let response = serde_json::json!({"error": {"message": "quota"}});
        assert!(matches!(
            extract_content(&response),
            Err(RecapError::SummaryFailed { .. })
        ));
    }
}
