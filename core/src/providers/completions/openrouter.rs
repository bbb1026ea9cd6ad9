use async_trait::async_trait;

use super::chat::{ChatEndpoint, ModelConfig};
use crate::completion::{CompletionError, CompletionModel, Message, TokenUsage};

const API_KEY_ENV_VAR: &str = "SENA_OPENROUTER_API_KEY";
const MODEL_ENV_VAR: &str = "SENA_OPENROUTER_MODEL";
const URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "meta-llama/llama-3-8b-instruct";

/// [OpenRouter](https://openrouter.ai) chat completions.
///
/// # Supported Configuration
///
/// - `model`: model identifier; when absent the `SENA_OPENROUTER_MODEL`
///   environment variable is consulted, then `meta-llama/llama-3-8b-instruct`
/// - `api_key_var`: environment variable holding the API key
///   (`SENA_OPENROUTER_API_KEY` by default)
/// - `api_url`: custom endpoint URL
///
/// ```rust,no_run
/// use sena::providers::completions::OpenRouter;
///
/// let model = OpenRouter::new(Some(r#"{"model": "mistralai/mistral-7b-instruct"}"#)).unwrap();
/// ```
pub struct OpenRouterCompletionModel {
    endpoint: ChatEndpoint,
}

impl OpenRouterCompletionModel {
    /// # Errors
    /// Fails if the JSON config is malformed or has unknown fields.
    pub fn new(json_config: Option<&str>) -> Result<Self, serde_json::Error> {
        let config = ModelConfig::parse(json_config)?;
        let model = config
            .model
            .or_else(|| std::env::var(MODEL_ENV_VAR).ok().filter(|m| !m.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            endpoint: ChatEndpoint::new(
                "openrouter",
                config.api_key_var.unwrap_or_else(|| API_KEY_ENV_VAR.to_string()),
                config.api_url.unwrap_or_else(|| URL.to_string()),
                model,
            ),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.endpoint.model()
    }
}

#[async_trait]
impl CompletionModel for OpenRouterCompletionModel {
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
