use serde::{Deserialize, Serialize};

use crate::error::{RecapError, Result};

/// OpenAI-compatible chat completion backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Grok,
    Openai,
    Gemini,
}

impl Provider {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Provider::Grok => "https://api.x.ai/v1/chat/completions",
            Provider::Openai => "https://api.openai.com/v1/chat/completions",
            Provider::Gemini => {
                "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions"
            }
        }
    }

    /// Model used when neither settings nor the command line pick one.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Grok => "grok-4-fast",
            Provider::Openai => "gpt-5-mini",
            Provider::Gemini => "gemini-2.5-flash",
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Grok => "XAI_API_KEY",
            Provider::Openai => "OPENAI_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Short identifier used in cache tags and `models` settings keys.
    pub fn slug(&self) -> &'static str {
        match self {
            Provider::Grok => "grok",
            Provider::Openai => "openai",
            Provider::Gemini => "gemini",
        }
    }

    /// The API key from the environment; blank values count as missing.
    pub fn validate_api_key(&self) -> Result<String> {
        let var = self.api_key_var();
        std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RecapError::MissingApiKey {
                env_var: var.to_string(),
            })
    }
}
