//! reqwest-backed client for OpenAI-compatible chat-completion providers
//!
//! One POST per call, no retries and no timeout beyond reqwest's defaults.

use super::{CompletionClient, CompletionRequest, CompletionResponse};
use crate::config::LlmSettings;
use crate::error::{AppError, AppResult};
use crate::prompts::Conversation;
use async_trait::async_trait;
use std::time::Instant;

/// Path appended to the provider base URL
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Completion client for Groq (or any OpenAI-compatible base URL)
pub struct GroqClient {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl GroqClient {
    /// Create a client from provider settings
    ///
    /// The credential is not checked here; [`CompletionClient::complete`]
    /// resolves it on every call and fails before any network I/O when absent.
    pub fn new(settings: LlmSettings) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, settings })
    }

    /// Full chat-completions URL for the configured base URL
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}{}",
            self.settings.base_url().trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, conversation: &Conversation) -> AppResult<String> {
        let api_key = self.settings.credential()?;
        let url = self.chat_completions_url();
        let request = CompletionRequest::new(conversation);

        let started = Instant::now();
        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| {
                tracing::warn!(url = %url, error = %source, "Completion request failed to send");
                AppError::UpstreamUnavailable {
                    url: url.clone(),
                    source,
                }
            })?;

        let status = response.status();
        tracing::debug!(
            url = %url,
            status = %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Completion provider responded"
        );

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        url = %url,
                        status = status.as_u16(),
                        error = %e,
                        "Failed to read error response body"
                    );
                    String::new()
                }
            };
            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                body_len = body.len(),
                "Completion provider returned an error status"
            );
            return Err(AppError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: CompletionResponse = response.json().await.map_err(|e| {
            AppError::UpstreamResponse(format!("response body is not a chat completion: {}", e))
        })?;

        envelope.into_first_content().ok_or_else(|| {
            AppError::UpstreamResponse(
                "response has no choices[0].message.content".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_base_url(base_url: &str) -> GroqClient {
        GroqClient::new(LlmSettings::new(
            Some("key".to_string()),
            Some(base_url.to_string()),
        ))
        .expect("should build client")
    }

    #[test]
    fn test_chat_completions_url_joins_base() {
        let client = client_with_base_url("http://localhost:1234/v1");
        assert_eq!(
            client.chat_completions_url(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_chat_completions_url_tolerates_trailing_slash() {
        let client = client_with_base_url("http://localhost:1234/v1/");
        assert_eq!(
            client.chat_completions_url(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_chat_completions_url_uses_default_base() {
        let client = GroqClient::new(LlmSettings::new(None, None)).unwrap();
        assert_eq!(
            client.chat_completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}
