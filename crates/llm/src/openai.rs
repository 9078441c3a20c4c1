//! OpenAI-Compatible Provider
//!
//! Implementation of the LlmProvider trait for any server exposing
//! `/v1/chat/completions` (OpenAI, vLLM, LM Studio, llama.cpp server, ...).

use async_trait::async_trait;
use serde::Deserialize;

use super::provider::{ensure_success, line_stream, missing_api_key_error, LlmProvider};
use super::types::{LlmError, LlmResult, ProviderConfig, TextStream};
use crate::http_client::build_http_client;
use crate::streaming_adapters::OpenAiAdapter;

/// OpenAI-compatible provider
pub struct OpenAiCompatibleProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.proxy.as_ref(), config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// Full URL of the chat completions endpoint
    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.resolved_endpoint())
    }

    /// Build the request body for the API
    fn build_request_body(&self, prompt: &str, stream: bool) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": stream,
            "temperature": self.config.temperature,
        })
    }

    async fn post(&self, prompt: &str, stream: bool) -> LlmResult<reqwest::Response> {
        let url = self.completions_url();
        tracing::debug!(url = %url, model = %self.config.model, stream, "chat completion request");

        let mut request = self
            .client
            .post(&url)
            .json(&self.build_request_body(prompt, stream));
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;
        ensure_success(response, self.name()).await
    }

    /// Extract `choices[0].message.content` from a response
    fn parse_response(response: &ChatResponse) -> LlmResult<String> {
        response
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .map(|m| m.content.clone().unwrap_or_default())
            .ok_or_else(|| LlmError::ParseError {
                message: "Response contained no choices".to_string(),
            })
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(&self, prompt: &str) -> LlmResult<String> {
        let response = self.post(prompt, false).await?;
        let body: ChatResponse = response.json().await.map_err(|e| LlmError::ParseError {
            message: e.to_string(),
        })?;
        Self::parse_response(&body)
    }

    async fn stream_message(&self, prompt: &str) -> LlmResult<TextStream> {
        let response = self.post(prompt, true).await?;
        Ok(line_stream(response, OpenAiAdapter::new()))
    }

    async fn health_check(&self) -> LlmResult<()> {
        let url = format!("{}/v1/models", self.config.resolved_endpoint());
        let mut request = self.client.get(&url);
        match self.config.api_key.as_deref() {
            Some(key) => request = request.header("Authorization", format!("Bearer {}", key)),
            None if self.config.endpoint.is_none() => return Err(missing_api_key_error("openai")),
            None => {}
        }
        let response = request.send().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;
        ensure_success(response, self.name()).await.map(|_| ())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Chat completions response format
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderType;

    fn test_config() -> ProviderConfig {
        ProviderConfig {
            provider: ProviderType::OpenAiCompatible,
            endpoint: Some("http://localhost:8000".to_string()),
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            ..Default::default()
        }
    }

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiCompatibleProvider::new(test_config()).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-4o-mini");
        assert_eq!(
            provider.completions_url(),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body() {
        let provider = OpenAiCompatibleProvider::new(test_config()).unwrap();
        let body = provider.build_request_body("Refactor this", false);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Refactor this");
        assert_eq!(body["stream"], false);
        assert!(body["temperature"].is_number());
    }

    #[test]
    fn test_parse_response() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"@@ -1 +1 @@"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            OpenAiCompatibleProvider::parse_response(&body).unwrap(),
            "@@ -1 +1 @@"
        );

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            OpenAiCompatibleProvider::parse_response(&empty),
            Err(LlmError::ParseError { .. })
        ));
    }
}
