use async_trait::async_trait;

use super::chat::{ChatEndpoint, ModelConfig};
use crate::completion::{CompletionError, CompletionModel, Message, TokenUsage};

const API_KEY_ENV_VAR: &str = "SENA_OPENAI_API_KEY";
const URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI chat completions, the alternative to [`super::OpenRouter`].
///
/// Accepts the same optional JSON config (`model`, `api_key_var`, `api_url`).
pub struct OpenAICompletionModel {
    endpoint: ChatEndpoint,
}

impl OpenAICompletionModel {
    /// # Errors
    /// Fails if the JSON config is malformed or has unknown fields.
    pub fn new(json_config: Option<&str>) -> Result<Self, serde_json::Error> {
        let config = ModelConfig::parse(json_config)?;
        Ok(Self {
            endpoint: ChatEndpoint::new(
                "openai",
                config.api_key_var.unwrap_or_else(|| API_KEY_ENV_VAR.to_string()),
                config.api_url.unwrap_or_else(|| URL.to_string()),
                config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.endpoint.model()
    }
}

#[async_trait]
impl CompletionModel for OpenAICompletionModel {
    fn name(&self) -> &str {
        self.endpoint.provider()
    }

    async fn send(
        &self,
        messages: &[Message],
        temperature: f64,
        max_tokens: Option<usize>,
    ) -> Result<(Message, TokenUsage), CompletionError> {
        self.endpoint.send(messages, temperature, max_tokens).await
    }
}
