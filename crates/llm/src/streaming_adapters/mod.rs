//! Provider-Specific Stream Adapters
//!
//! Each adapter handles the line format of its backend's streaming mode.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaAdapter;
pub use openai::OpenAiAdapter;
