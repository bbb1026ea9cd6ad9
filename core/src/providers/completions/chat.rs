use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, instrument};

use crate::completion::{ChatMessage, CompletionError, Message, TokenUsage};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Optional JSON config accepted by the OpenAI-compatible providers.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct ModelConfig {
    pub api_key_var: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
}

impl ModelConfig {
    pub(crate) fn parse(json_config: Option<&str>) -> Result<Self, serde_json::Error> {
        json_config.map_or_else(|| Ok(Self::default()), serde_json::from_str)
    }
}

/// An OpenAI-style `/chat/completions` endpoint with bearer authentication.
pub(crate) struct ChatEndpoint {
    provider: &'static str,
    api_key_var: String,
    api_key: Option<String>,
    api_url: String,
    model: String,
    client: reqwest::Client,
}

impl ChatEndpoint {
    /// The key is looked up once, here. A missing key only surfaces when a
    /// request is attempted.
    pub(crate) fn new(
        provider: &'static str,
        api_key_var: String,
        api_url: String,
        model: String,
    ) -> Self {
        let api_key = std::env::var(&api_key_var)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self {
            provider,
            api_key_var,
            api_key,
            api_url,
            model,
            client: reqwest::Client::new(),
        }
    }

    pub(crate) fn provider(&self) -> &'static str {
        self.provider
    }

    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    #[instrument(
        skip(self, messages, temperature, max_tokens),
        fields(provider = self.provider, model = %self.model, message_count = messages.len())
    )]
    pub(crate) async fn send(
        &self,
        messages: &[Message],
        temperature: f64,
        max_tokens: Option<usize>,
    ) -> Result<(Message, TokenUsage), CompletionError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            error!(var = %self.api_key_var, "API key missing");
            CompletionError::MissingApiKey(self.api_key_var.clone())
        })?;

        let messages: Vec<ChatMessage> = messages.iter().map(Into::into).collect();
        let mut request_body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
        });
        if let (Some(max_tokens), Some(obj)) = (max_tokens, request_body.as_object_mut()) {
            obj.insert("max_tokens".to_string(), json!(max_tokens));
        }

        debug!(request_body = ?request_body, "Sending completion request");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Request failed");
                CompletionError::RequestError(e.to_string())
            })?;

        let status = response.status();
        debug!(%status, "Received API response");

        if !status.is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error (failed to read response body)".to_string());
            error!(
                status = %status,
                error = %error_msg,
                "API returned error response"
            );
            return Err(CompletionError::ProviderError(status.as_u16(), error_msg));
        }

        let response_json: serde_json::Value = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response JSON");
            CompletionError::ParseError(e.to_string())
        })?;

        let message_json = &response_json["choices"][0]["message"];
        if message_json.is_null() {
            return Err(CompletionError::ParseError(
                "Invalid response body: no choices".to_string(),
            ));
        }
        let content = &message_json["content"];
        let response_message = if content.is_null() {
            String::new()
        } else {
            content
                .as_str()
                .ok_or(CompletionError::ParseError(
                    "Invalid response body".to_string(),
                ))?
                .to_string()
        };

        let usage = &response_json["usage"];
        let token_usage = TokenUsage {
            prompt_tokens: usage["prompt_tokens"].as_u64(),
            completion_tokens: usage["completion_tokens"].as_u64(),
            total_tokens: usage["total_tokens"].as_u64(),
        };
        info!(
            prompt_tokens = token_usage.prompt_tokens,
            completion_tokens = token_usage.completion_tokens,
            total_tokens = token_usage.total_tokens,
            "Token usage recorded"
        );

        Ok((Message::Assistant(response_message), token_usage))
    }
}
