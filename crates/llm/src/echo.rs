//! Echo Provider
//!
//! Offline backend used when no AI service is configured. It answers every
//! prompt with `Echo: <prompt>`.

use async_trait::async_trait;
use futures_util::stream;

use super::provider::LlmProvider;
use super::types::{LlmResult, ProviderConfig, TextStream};

pub struct EchoProvider {
    config: ProviderConfig,
}

impl EchoProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    fn reply(prompt: &str) -> String {
        format!("Echo: {}", prompt)
    }
}

impl Default for EchoProvider {
    fn default() -> Self {
        Self::new(ProviderConfig::default())
    }
}

#[async_trait]
impl LlmProvider for EchoProvider {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(&self, prompt: &str) -> LlmResult<String> {
        Ok(Self::reply(prompt))
    }

    async fn stream_message(&self, prompt: &str) -> LlmResult<TextStream> {
        // Word-sized chunks, whitespace kept so the chunks concatenate back
        let chunks: Vec<LlmResult<String>> = Self::reply(prompt)
            .split_inclusive(char::is_whitespace)
            .map(|chunk| Ok(chunk.to_string()))
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}
