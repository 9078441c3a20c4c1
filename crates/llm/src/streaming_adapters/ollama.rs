//! Ollama NDJSON Stream Adapter
//!
//! `/api/generate` with `stream: true` returns one JSON object per line:
//! `{"response": "...", "done": false}` and finally `{"done": true, ...}`.

use ghostline_core::streaming::{AdapterError, StreamAdapter, StreamEvent};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Adapter for Ollama's streaming generate endpoint
#[derive(Debug, Default)]
pub struct OllamaAdapter;

impl OllamaAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl StreamAdapter for OllamaAdapter {
    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn adapt(&mut self, input: &str) -> Result<Vec<StreamEvent>, AdapterError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(vec![]);
        }

        let chunk: GenerateChunk =
            serde_json::from_str(trimmed).map_err(|e| AdapterError::ParseError(e.to_string()))?;

        if let Some(message) = chunk.error {
            return Ok(vec![StreamEvent::Error { message }]);
        }

        let mut events = vec![];
        if let Some(content) = chunk.response.filter(|c| !c.is_empty()) {
            events.push(StreamEvent::TextDelta { content });
        }
        if chunk.done {
            events.push(StreamEvent::Complete {
                stop_reason: chunk.done_reason,
            });
        }
        Ok(events)
    }
}
