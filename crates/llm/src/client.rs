//! AI Client
//!
//! Front door used by the prompt and refactor layers. Wraps one provider and
//! applies the soft-disable policy: the first backend failure moves the client
//! to `Disabled`, after which every call returns [`DISABLED_SENTINEL`] without
//! touching the network. `reset` is the only way back to `Enabled`.

use std::sync::{Arc, Mutex};

use futures_util::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::echo::EchoProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiCompatibleProvider;
use crate::provider::LlmProvider;
use crate::types::{LlmError, LlmResult, ProviderConfig, ProviderType};

/// Text returned in place of a response once the backend is disabled.
pub const DISABLED_SENTINEL: &str =
    "AI backend unavailable; further requests are disabled for this session.";

/// Stream of response chunks as seen by client consumers. Never fails; a
/// failure ends the stream with the sentinel.
pub type ChunkStream = BoxStream<'static, String>;

/// Response from a non-streaming call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiResponse {
    pub text: String,
}

/// Backend availability state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendState {
    Enabled,
    Disabled { reason: String },
}

/// Build the provider described by `config`.
pub fn create_provider(config: ProviderConfig) -> LlmResult<Arc<dyn LlmProvider>> {
    if config.provider != ProviderType::Echo {
        let endpoint = config.resolved_endpoint();
        url::Url::parse(&endpoint).map_err(|e| LlmError::InvalidRequest {
            message: format!("Invalid endpoint '{}': {}", endpoint, e),
        })?;
    }

    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderType::Echo => Arc::new(EchoProvider::new(config)),
        ProviderType::Ollama => Arc::new(OllamaProvider::new(config)?),
        ProviderType::OpenAiCompatible => Arc::new(OpenAiCompatibleProvider::new(config)?),
    };
    Ok(provider)
}

/// Soft-disabling AI client.
pub struct AiClient {
    provider: Arc<dyn LlmProvider>,
    state: Arc<Mutex<BackendState>>,
}

impl AiClient {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(BackendState::Enabled)),
        }
    }

    /// Build a client for the configured backend.
    pub fn from_config(config: ProviderConfig) -> LlmResult<Self> {
        Ok(Self::new(create_provider(config)?))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn state(&self) -> BackendState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state(), BackendState::Enabled)
    }

    /// Re-arm a disabled client.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let BackendState::Disabled { reason } = &*state {
            tracing::info!(provider = self.provider.name(), previous_failure = %reason, "AI backend re-enabled");
        }
        *state = BackendState::Enabled;
    }

    /// Send a prompt, optionally decorated with a context block.
    pub async fn send(&self, prompt: &str, context: Option<&str>) -> AiResponse {
        if !self.is_enabled() {
            return AiResponse {
                text: DISABLED_SENTINEL.to_string(),
            };
        }

        let decorated = match context {
            Some(ctx) if !ctx.is_empty() => format!("[context]\n{}\n\n{}", ctx, prompt),
            _ => prompt.to_string(),
        };

        match self.provider.send_message(&decorated).await {
            Ok(text) => AiResponse { text },
            Err(e) => {
                disable(&self.state, self.provider.name(), &e);
                AiResponse {
                    text: DISABLED_SENTINEL.to_string(),
                }
            }
        }
    }

    /// Stream a response chunk by chunk.
    ///
    /// A failure opening the stream, or any error item mid-stream, disables
    /// the client and ends the stream with the sentinel chunk.
    pub async fn stream(&self, prompt: &str) -> ChunkStream {
        if !self.is_enabled() {
            return stream::once(async { DISABLED_SENTINEL.to_string() }).boxed();
        }

        let inner = match self.provider.stream_message(prompt).await {
            Ok(inner) => inner,
            Err(e) => {
                disable(&self.state, self.provider.name(), &e);
                return stream::once(async { DISABLED_SENTINEL.to_string() }).boxed();
            }
        };

        let state = Arc::clone(&self.state);
        let provider = self.provider.name();
        stream::unfold(Some(inner), move |inner| {
            let state = Arc::clone(&state);
            async move {
                let mut inner = inner?;
                match inner.next().await {
                    Some(Ok(chunk)) => Some((chunk, Some(inner))),
                    Some(Err(e)) => {
                        disable(&state, provider, &e);
                        Some((DISABLED_SENTINEL.to_string(), None))
                    }
                    None => None,
                }
            }
        })
        .boxed()
    }
}

/// One-way transition to `Disabled`. Later failures keep the first reason.
fn disable(state: &Mutex<BackendState>, provider: &str, error: &LlmError) {
    let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
    if matches!(*state, BackendState::Enabled) {
        tracing::warn!(provider, error = %error, "AI backend failed; disabling for this session");
        *state = BackendState::Disabled {
            reason: error.to_string(),
        };
    }
}
