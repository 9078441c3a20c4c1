//! OpenAI-Compatible SSE Stream Adapter
//!
//! Handles `data: {...}` lines from `/v1/chat/completions` with
//! `stream: true`, terminated by `data: [DONE]`.

use ghostline_core::streaming::{AdapterError, StreamAdapter, StreamEvent};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChunkEvent {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    delta: Option<Delta>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Adapter for OpenAI-compatible SSE streams
#[derive(Debug, Default)]
pub struct OpenAiAdapter {
    finished: bool,
}

impl OpenAiAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreamAdapter for OpenAiAdapter {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn adapt(&mut self, input: &str) -> Result<Vec<StreamEvent>, AdapterError> {
        let trimmed = input.trim();

        // Comments, keep-alives and event names carry no content
        let json_str = match trimmed.strip_prefix("data:") {
            Some(rest) => rest.trim(),
            None => return Ok(vec![]),
        };

        if json_str == "[DONE]" {
            if self.finished {
                return Ok(vec![]);
            }
            self.finished = true;
            return Ok(vec![StreamEvent::Complete { stop_reason: None }]);
        }
        if json_str.is_empty() {
            return Ok(vec![]);
        }

        let event: ChunkEvent =
            serde_json::from_str(json_str).map_err(|e| AdapterError::ParseError(e.to_string()))?;

        if let Some(error) = event.error {
            return Ok(vec![StreamEvent::Error {
                message: error.message,
            }]);
        }

        let mut events = vec![];
        for choice in event.choices {
            if let Some(content) = choice
                .delta
                .and_then(|d| d.content)
                .filter(|c| !c.is_empty())
            {
                events.push(StreamEvent::TextDelta { content });
            }
            if let Some(reason) = choice.finish_reason {
                self.finished = true;
                events.push(StreamEvent::Complete {
                    stop_reason: Some(reason),
                });
            }
        }
        Ok(events)
    }

    fn reset(&mut self) {
        self.finished = false;
    }
}
