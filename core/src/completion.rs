//! Chat-completion abstraction shared by every hosted model provider.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Message that'll be sent in completions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// System prompt
    Preamble(String),
    /// Message sent by the user
    User(String),
    /// Response from the assistant
    Assistant(String),
}

impl Message {
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Message::Preamble(s) | Message::User(s) | Message::Assistant(s) => s,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("API key missing, set the `{0}` environment variable")]
    MissingApiKey(String),
    #[error("Provider error -> HTTP Status {0}: {1}")]
    ProviderError(u16, String),
    #[error("RequestError: {0}")]
    RequestError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("No completion provider configured")]
    NoProviders,
}

/// A hosted chat-completion endpoint.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &str;

    /// Send the conversation to the LLM and get a reply
    async fn send(
        &self,
        messages: &[Message],
        temperature: f64,
        max_tokens: Option<usize>,
    ) -> Result<(Message, TokenUsage), CompletionError>;
}

#[async_trait]
impl<M: CompletionModel + ?Sized> CompletionModel for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn send(
        &self,
        messages: &[Message],
        temperature: f64,
        max_tokens: Option<usize>,
    ) -> Result<(Message, TokenUsage), CompletionError> {
        (**self).send(messages, temperature, max_tokens).await
    }
}

/// Wire form of [`Message`] for OpenAI-compatible chat endpoints.
#[derive(Serialize, Debug, Eq, PartialEq)]
#[serde(tag = "role", content = "content")]
#[allow(non_camel_case_types)]
pub(crate) enum ChatMessage<'a> {
    system(&'a str),
    user(&'a str),
    assistant(&'a str),
}

impl<'a> From<&'a Message> for ChatMessage<'a> {
    fn from(value: &'a Message) -> Self {
        match value {
            Message::Preamble(s) => ChatMessage::system(s),
            Message::User(s) => ChatMessage::user(s),
            Message::Assistant(s) => ChatMessage::assistant(s),
        }
    }
}
