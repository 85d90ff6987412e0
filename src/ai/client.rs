//! OpenAI-backed summarizer.

use super::summarizer::Summarizer;
use anyhow::{Context as _, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use secrecy::{ExposeSecret as _, SecretString};
use std::time::Duration;

pub use crate::config::AIConfig;

const SYSTEM_PROMPT: &str =
    "You are a data analyst who writes clear, compelling dataset summaries.";

/// Rewrites profile text through the chat completions endpoint.
///
/// Each call is one HTTP request. The client's retry layer is disabled, so
/// 429 and 5xx responses surface as errors instead of being retried.
pub struct OpenAiSummarizer {
    client: Client<OpenAIConfig>,
    config: AIConfig,
}

impl OpenAiSummarizer {
    pub fn new(api_key: &SecretString, config: AIConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        if let Some(base) = &config.api_base {
            openai_config = openai_config.with_api_base(base);
        }
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let client = Client::with_config(openai_config).with_backoff(no_retry);

        Self { client, config }
    }

    pub fn config(&self) -> &AIConfig {
        &self.config
    }

    fn user_prompt(text: &str) -> String {
        format!("Please summarize this dataset analysis in detail:\n\n{text}")
    }

    fn messages(text: &str) -> Result<Vec<ChatCompletionRequestMessage>> {
        Ok(vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .context("Failed to build system message")?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(Self::user_prompt(text))
                .build()
                .context("Failed to build user message")?
                .into(),
        ])
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(Self::messages(text)?)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build()
            .context("Failed to build chat completion request")?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| anyhow::anyhow!("OpenAI API error: {e}"))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("No response content received"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}
