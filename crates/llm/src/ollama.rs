//! Ollama Provider
//!
//! Talks to a local (or remote) Ollama server through `/api/generate`.

use async_trait::async_trait;
use serde::Deserialize;

use super::provider::{ensure_success, line_stream, LlmProvider};
use super::types::{LlmError, LlmResult, ProviderConfig, TextStream};
use crate::http_client::build_http_client;
use crate::streaming_adapters::OllamaAdapter;

/// Ollama provider
pub struct OllamaProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Create a new Ollama provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.proxy.as_ref(), config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// Full URL of the generate endpoint
    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.resolved_endpoint())
    }

    /// Build the request body for the API
    fn build_request_body(&self, prompt: &str, stream: bool) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": stream,
        })
    }

    async fn post(&self, prompt: &str, stream: bool) -> LlmResult<reqwest::Response> {
        let url = self.generate_url();
        tracing::debug!(url = %url, model = %self.config.model, stream, "ollama request");
        let response = self
            .client
            .post(&url)
            .json(&self.build_request_body(prompt, stream))
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;
        ensure_success(response, self.name()).await
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(&self, prompt: &str) -> LlmResult<String> {
        let response = self.post(prompt, false).await?;
        let body: GenerateResponse = response.json().await.map_err(|e| LlmError::ParseError {
            message: e.to_string(),
        })?;
        Ok(body.response)
    }

    async fn stream_message(&self, prompt: &str) -> LlmResult<TextStream> {
        let response = self.post(prompt, true).await?;
        Ok(line_stream(response, OllamaAdapter::new()))
    }

    async fn health_check(&self) -> LlmResult<()> {
        let url = format!("{}/api/tags", self.config.resolved_endpoint());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: format!("Ollama not reachable at {}: {}", url, e),
            })?;
        ensure_success(response, self.name()).await.map(|_| ())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Non-streaming `/api/generate` response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderType;

    fn test_config() -> ProviderConfig {
        ProviderConfig {
            provider: ProviderType::Ollama,
            model: "codellama".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_provider_creation() {
        let provider = OllamaProvider::new(test_config()).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "codellama");
        assert_eq!(provider.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_request_body() {
        let provider = OllamaProvider::new(test_config()).unwrap();
        let body = provider.build_request_body("hello", false);
        assert_eq!(body["model"], "codellama");
        assert_eq!(body["prompt"], "hello");
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn test_custom_endpoint() {
        let config = ProviderConfig {
            endpoint: Some("http://gpu-box:11434/".to_string()),
            ..test_config()
        };
        let provider = OllamaProvider::new(config).unwrap();
        assert_eq!(provider.generate_url(), "http://gpu-box:11434/api/generate");
    }

    #[test]
    fn test_response_parsing() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"model":"codellama","response":"Hi","done":true}"#).unwrap();
        assert_eq!(body.response, "Hi");
    }
}
