//! Ghostline LLM
//!
//! Unified interface for the AI backends Ghostline Studio can talk to:
//! - Echo (offline, default)
//! - Ollama (`/api/generate`)
//! - Any OpenAI-compatible server (`/v1/chat/completions`)
//!
//! Also includes the line-oriented streaming adapters, the HTTP client
//! factory, and [`AiClient`], which soft-disables itself after a backend
//! failure.

pub mod client;
pub mod echo;
pub mod http_client;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod streaming_adapters;
pub mod types;

// Re-export main types
pub use client::{create_provider, AiClient, AiResponse, BackendState, ChunkStream, DISABLED_SENTINEL};
pub use echo::EchoProvider;
pub use http_client::build_http_client;
pub use ollama::OllamaProvider;
pub use openai::OpenAiCompatibleProvider;
pub use provider::LlmProvider;
pub use types::*;

// Re-export streaming adapters
pub use streaming_adapters::{OllamaAdapter, OpenAiAdapter};
