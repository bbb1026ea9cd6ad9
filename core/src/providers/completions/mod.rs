pub(crate) mod chat;
pub(crate) mod fallback;
pub(crate) mod openai;
pub(crate) mod openrouter;

pub use fallback::FallbackCompletionModel as Fallback;
pub use openai::OpenAICompletionModel as OpenAI;
pub use openrouter::OpenRouterCompletionModel as OpenRouter;

use crate::completion::CompletionModel;
use crate::config::ProviderKind;

/// Build the completion model for the configured provider list.
///
/// A single provider is used as is; several are wrapped in a [`Fallback`] that
/// tries them in order.
///
/// # Errors
/// Never fails for the default configuration; the `Result` mirrors the provider
/// constructors, which reject malformed JSON configs.
pub fn from_kinds(kinds: &[ProviderKind]) -> Result<Box<dyn CompletionModel>, serde_json::Error> {
    let mut models: Vec<Box<dyn CompletionModel>> = Vec::with_capacity(kinds.len());
    for kind in kinds {
        models.push(match kind {
            ProviderKind::OpenRouter => Box::new(OpenRouter::new(None)?),
            ProviderKind::OpenAI => Box::new(OpenAI::new(None)?),
        });
    }
    if models.len() == 1 {
        if let Some(model) = models.pop() {
            return Ok(model);
        }
    }
    Ok(Box::new(Fallback::new(models)))
}
