use async_trait::async_trait;
use tracing::warn;

use crate::completion::{CompletionError, CompletionModel, Message, TokenUsage};

/// Tries each model in order and returns the first successful reply.
///
/// When every model fails the error of the last one is returned.
pub struct FallbackCompletionModel {
    models: Vec<Box<dyn CompletionModel>>,
}

impl FallbackCompletionModel {
    #[must_use]
    pub fn new(models: Vec<Box<dyn CompletionModel>>) -> Self {
        Self { models }
    }
}

#[async_trait]
impl CompletionModel for FallbackCompletionModel {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn send(
        &self,
        messages: &[Message],
        temperature: f64,
        max_tokens: Option<usize>,
    ) -> Result<(Message, TokenUsage), CompletionError> {
        let mut last_error = CompletionError::NoProviders;
        for model in &self.models {
            match model.send(messages, temperature, max_tokens).await {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    warn!(provider = model.name(), error = %e, "Provider failed, trying next");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}
