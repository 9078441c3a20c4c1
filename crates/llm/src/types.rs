//! LLM Types
//!
//! Provider configuration, error taxonomy, and the text stream type shared by
//! every provider.

use std::pin::Pin;
use std::str::FromStr;

use futures_util::Stream;
use ghostline_core::proxy::ProxyConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lazy, single-consumer, finite stream of response chunks.
pub type TextStream = Pin<Box<dyn Stream<Item = LlmResult<String>> + Send>>;

/// Supported backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Offline echo backend
    #[default]
    Echo,
    /// Ollama-style `/api/generate`
    Ollama,
    /// OpenAI-compatible `/v1/chat/completions`
    #[serde(rename = "openai")]
    OpenAiCompatible,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Echo => "echo",
            ProviderType::Ollama => "ollama",
            ProviderType::OpenAiCompatible => "openai",
        }
    }

    /// Endpoint used when the configuration leaves it empty.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderType::Echo => "",
            ProviderType::Ollama => "http://localhost:11434",
            ProviderType::OpenAiCompatible => "https://api.openai.com",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "echo" | "dummy" => Ok(ProviderType::Echo),
            "ollama" => Ok(ProviderType::Ollama),
            "openai" | "openai-compatible" | "openai_compatible" => {
                Ok(ProviderType::OpenAiCompatible)
            }
            other => Err(LlmError::InvalidRequest {
                message: format!("Unknown AI backend: {}", other),
            }),
        }
    }
}

/// Configuration for a single backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderType,
    /// Base URL; the provider appends its own path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::Echo,
            endpoint: None,
            model: String::new(),
            api_key: None,
            temperature: 0.2,
            timeout_secs: 60,
            proxy: None,
        }
    }
}

impl ProviderConfig {
    /// Configured endpoint, or the provider default, without a trailing slash.
    pub fn resolved_endpoint(&self) -> String {
        let endpoint = self
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_endpoint());
        endpoint.trim_end_matches('/').to_string()
    }
}

/// Errors produced by backends.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Server error ({status:?}): {message}")]
    ServerError { message: String, status: Option<u16> },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// The client has been soft-disabled after an earlier failure
    #[error("Backend disabled: {reason}")]
    Disabled { reason: String },

    #[error("{message}")]
    Other { message: String },
}

/// Result type alias for backend calls
pub type LlmResult<T> = Result<T, LlmError>;

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LlmError::ParseError {
                message: err.to_string(),
            }
        } else {
            LlmError::NetworkError {
                message: err.to_string(),
            }
        }
    }
}
