//! LLM Provider Trait
//!
//! Defines the common interface for all AI backends, plus helpers shared by
//! the HTTP providers.

use std::string::FromUtf8Error;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::types::{LlmError, LlmResult, ProviderConfig, TextStream};
use ghostline_core::streaming::{StreamAdapter, StreamEvent};

/// Trait that all AI backends must implement.
///
/// Provides a unified interface for:
/// - Single prompt completions (send_message)
/// - Streaming completions (stream_message)
/// - Health checking
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Send a prompt and get the complete response text.
    async fn send_message(&self, prompt: &str) -> LlmResult<String>;

    /// Stream a response as text chunks.
    ///
    /// Errors opening the request are returned directly; errors after the
    /// first byte arrive as `Err` items in the stream.
    async fn stream_message(&self, prompt: &str) -> LlmResult<TextStream>;

    /// Check if the provider is reachable.
    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to parse HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}

/// Check the response status, turning non-2xx responses into errors.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    provider: &str,
) -> LlmResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(parse_http_error(status.as_u16(), &body, provider))
}

/// Turn a streaming HTTP body into a `TextStream` using a line adapter.
///
/// The body is read on a background task and forwarded through a bounded
/// channel, so the consumer controls the pace.
pub(crate) fn line_stream<A>(response: reqwest::Response, adapter: A) -> TextStream
where
    A: StreamAdapter + 'static,
{
    byte_line_stream(response.bytes_stream(), adapter)
}

/// Line-split a raw byte stream and adapt each complete line.
///
/// Bytes are buffered until a `\n` arrives, so multi-byte characters split
/// across chunks are decoded intact.
pub(crate) fn byte_line_stream<S, B, E, A>(body: S, mut adapter: A) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Into<LlmError> + Send,
    A: StreamAdapter + 'static,
{
    let (tx, rx) = mpsc::channel::<LlmResult<String>>(32);

    tokio::spawn(async move {
        let mut body = Box::pin(body);
        let mut lines = LineBuffer::default();

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(bytes) => bytes,
                Err(e) => {
                    let _ = tx.send(Err(e.into())).await;
                    return;
                }
            };
            lines.push(chunk.as_ref());

            while let Some(line) = lines.next_line() {
                if !forward_decoded(&mut adapter, line, &tx).await {
                    return;
                }
            }
        }

        if let Some(rest) = lines.finish() {
            forward_decoded(&mut adapter, rest, &tx).await;
        }
    });

    Box::pin(ReceiverStream::new(rx))
}

/// Byte buffer that yields complete `\n`-terminated lines.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    fn next_line(&mut self) -> Option<Result<String, FromUtf8Error>> {
        let end = self.pending.iter().position(|b| *b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=end).collect();
        Some(String::from_utf8(line))
    }

    /// Trailing bytes without a newline, unless they are only whitespace.
    fn finish(&mut self) -> Option<Result<String, FromUtf8Error>> {
        if self.pending.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        Some(String::from_utf8(std::mem::take(&mut self.pending)))
    }
}

async fn forward_decoded<A: StreamAdapter>(
    adapter: &mut A,
    line: Result<String, FromUtf8Error>,
    tx: &mpsc::Sender<LlmResult<String>>,
) -> bool {
    match line {
        Ok(line) => forward_line(adapter, &line, tx).await,
        Err(e) => {
            tracing::debug!(provider = adapter.provider_name(), error = %e, "stream line is not UTF-8");
            let _ = tx
                .send(Err(LlmError::ParseError {
                    message: e.to_string(),
                }))
                .await;
            false
        }
    }
}

/// Adapt one line and forward its text. Returns false once the stream ended.
async fn forward_line<A: StreamAdapter>(
    adapter: &mut A,
    line: &str,
    tx: &mpsc::Sender<LlmResult<String>>,
) -> bool {
    let events = match adapter.adapt(line) {
        Ok(events) => events,
        Err(e) => {
            tracing::debug!(provider = adapter.provider_name(), error = %e, "unparseable stream line");
            let _ = tx
                .send(Err(LlmError::ParseError {
                    message: e.to_string(),
                }))
                .await;
            return false;
        }
    };

    for event in events {
        match event {
            StreamEvent::TextDelta { content } => {
                if tx.send(Ok(content)).await.is_err() {
                    // Consumer dropped the stream
                    return false;
                }
            }
            StreamEvent::Error { message } => {
                let _ = tx
                    .send(Err(LlmError::ServerError {
                        message,
                        status: None,
                    }))
                    .await;
                return false;
            }
            StreamEvent::Complete { .. } => return false,
        }
    }
    true
}
