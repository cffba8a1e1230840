use serde::{Deserialize, Serialize};

/// Upper bound on completion tokens requested from the backend.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Where completions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// api.openai.com.
    OpenAi,
    /// openrouter.ai, with attribution headers.
    OpenRouter,
    /// Groq cloud inference, OpenAI-compatible API.
    Groq,
    /// Local Ollama server through its OpenAI-compatible endpoint.
    Ollama,
}

/// The `[model]` section: which model to call and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Which API family to talk to.
    pub provider: LlmProvider,
    /// Model name as the provider knows it.
    pub model_id: String,
    /// Bearer token. Empty sends no `Authorization` header.
    #[serde(default)]
    pub api_key: String,
    /// Overrides the provider's default endpoint.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Completion limit for create and refine requests.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl ModelConfig {
    /// Endpoint root without a trailing slash.
    pub fn base_url(&self) -> &str {
        if let Some(url) = &self.api_base_url {
            url.trim_end_matches('/')
        } else {
            match self.provider {
                LlmProvider::OpenAi => "https://api.openai.com",
                LlmProvider::OpenRouter => "https://openrouter.ai/api",
                LlmProvider::Groq => "https://api.groq.com/openai",
                LlmProvider::Ollama => "http://localhost:11434",
            }
        }
    }

    /// Full URL of the chat-completions endpoint.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_toml() {
        let config: ModelConfig = toml::from_str(
            r#"
provider = "groq"
model_id = "llama-3.3-70b-versatile"
"#,
        )
        .unwrap();
        assert_eq!(config.provider, LlmProvider::Groq);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 8192);
        assert!(config.api_key.is_empty());
        assert_eq!(config.base_url(), "https://api.groq.com/openai");
    }

    #[test]
    fn test_base_url_override_trims_slash() {
        let config = ModelConfig {
            provider: LlmProvider::OpenAi,
            model_id: "gpt-4o".into(),
            api_key: String::new(),
            api_base_url: Some("http://127.0.0.1:7878/".into()),
            temperature: 0.2,
            max_tokens: 100,
        };
        assert_eq!(
            config.chat_completions_url(),
            "http://127.0.0.1:7878/v1/chat/completions"
        );
    }

    #[test]
    fn test_provider_names() {
        let openai = serde_json::to_string(&LlmProvider::OpenAi).unwrap();
        let ollama = serde_json::to_string(&LlmProvider::Ollama).unwrap();
        assert_eq!(openai, "\"openai\"");
        assert_eq!(ollama, "\"ollama\"");
    }
}
