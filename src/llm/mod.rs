//! Completion provider client
//!
//! Handlers talk to the provider through the [`CompletionClient`] trait so the
//! HTTP implementation can be swapped for a stub in tests.

use crate::error::AppResult;
use crate::prompts::{ChatMessage, Conversation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod client;

pub use client::GroqClient;

/// Model every completion request targets
pub const MODEL: &str = "llama-3.3-70b-versatile";
pub const TEMPERATURE: f64 = 0.5;
pub const MAX_TOKENS: u32 = 2000;
pub const TOP_P: f64 = 1.0;

/// Produces one completion for a conversation
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Return the text content of the first generated message
    async fn complete(&self, conversation: &Conversation) -> AppResult<String>;
}

/// Chat-completion request body
///
/// Sampling parameters are fixed; only the messages vary per call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    model: &'static str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    stream: bool,
    stop: Option<&'static str>,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(conversation: &'a Conversation) -> Self {
        Self {
            model: MODEL,
            messages: conversation.messages(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
            stream: false,
            stop: None,
        }
    }
}

/// The subset of the provider's chat-completion envelope this relay reads
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first choice, if the provider returned one
    pub fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}
