//! Refactor Pipeline
//!
//! Runs an AI code action against an editor buffer:
//! collect context → build prompt → stream the reply → apply the diff → write
//! the result back as one undoable edit.
//!
//! The buffer is only touched once the whole patch has applied cleanly.

use std::sync::Arc;

use futures_util::StreamExt;
use ghostline_llm::AiClient;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::buffer::EditorBuffer;
use super::diff::{PatchApplicationError, UnifiedDiffApplier};

/// Built-in code actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefactorAction {
    ImproveReadability,
    OptimizeImports,
    ConvertToDataclass,
    GenerateTests,
}

impl RefactorAction {
    pub const ALL: [RefactorAction; 4] = [
        RefactorAction::ImproveReadability,
        RefactorAction::OptimizeImports,
        RefactorAction::ConvertToDataclass,
        RefactorAction::GenerateTests,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            RefactorAction::ImproveReadability => "improve_readability",
            RefactorAction::OptimizeImports => "optimize_imports",
            RefactorAction::ConvertToDataclass => "convert_to_dataclass",
            RefactorAction::GenerateTests => "generate_tests",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.key() == key)
    }

    /// Prompt asking the backend for a unified diff over `code`.
    pub fn prompt(&self, code: &str) -> String {
        let instruction = match self {
            RefactorAction::ImproveReadability => {
                "Improve readability of this code and return a unified diff:"
            }
            RefactorAction::OptimizeImports => {
                "Optimize imports for this file and return a unified diff:"
            }
            RefactorAction::ConvertToDataclass => {
                "Convert any plain classes to dataclasses when appropriate. Respond with unified diff."
            }
            RefactorAction::GenerateTests => {
                "Generate missing tests for the following code. Respond with unified diff patch creating tests if needed."
            }
        };
        format!("{}\n{}", instruction, code)
    }
}

/// A code action requested from a menu or shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefactorRequest {
    /// Action key; unknown keys use `prompt_hint` as the instruction
    pub action: String,
    pub prompt_hint: String,
}

impl RefactorRequest {
    pub fn new(action: impl Into<String>, prompt_hint: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            prompt_hint: prompt_hint.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Patch(#[from] PatchApplicationError),

    #[error("Refactor cancelled")]
    Cancelled,

    #[error("AI backend unavailable")]
    BackendUnavailable,
}

/// Maps a source file to the tests worth running after editing it.
pub type TestSelector = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

pub struct RefactorPipeline {
    client: Arc<AiClient>,
    applier: UnifiedDiffApplier,
    test_selector: Option<TestSelector>,
}

impl RefactorPipeline {
    pub fn new(client: Arc<AiClient>) -> Self {
        Self {
            client,
            applier: UnifiedDiffApplier::new(),
            test_selector: None,
        }
    }

    pub fn with_test_selector<F>(mut self, selector: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        self.test_selector = Some(Arc::new(selector));
        self
    }

    pub fn available_actions(&self) -> Vec<&'static str> {
        RefactorAction::ALL.iter().map(RefactorAction::key).collect()
    }

    /// Tests related to `file_path`, or nothing without a selector.
    pub fn suggest_tests(&self, file_path: &str) -> Vec<String> {
        self.test_selector
            .as_ref()
            .map(|select| select(file_path))
            .unwrap_or_default()
    }

    pub async fn run(
        &self,
        buffer: &mut dyn EditorBuffer,
        request: &RefactorRequest,
    ) -> Result<String, PipelineError> {
        self.run_with_cancel(buffer, request, CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), checking `cancel` between streamed chunks.
    pub async fn run_with_cancel(
        &self,
        buffer: &mut dyn EditorBuffer,
        request: &RefactorRequest,
        cancel: CancellationToken,
    ) -> Result<String, PipelineError> {
        let context = collect_context(buffer);
        let prompt = construct_prompt(request, &context);
        tracing::info!(action = %request.action, context_len = context.len(), "refactor started");

        let response = self.stream_response(&prompt, &cancel).await?;
        if !self.client.is_enabled() {
            tracing::warn!(action = %request.action, "refactor aborted; AI backend disabled");
            return Err(PipelineError::BackendUnavailable);
        }

        let patched = self.applier.apply(&buffer.text(), &response).map_err(|e| {
            tracing::warn!(action = %request.action, error = %e, "AI patch rejected");
            PipelineError::from(e)
        })?;
        buffer.apply_edit_block(patched.clone());
        tracing::info!(action = %request.action, "refactor applied");
        Ok(patched)
    }

    async fn stream_response(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let mut stream = self.client.stream(prompt).await;
        let mut response = String::new();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(received = response.len(), "refactor stream cancelled");
                    return Err(PipelineError::Cancelled);
                }
                chunk = stream.next() => match chunk {
                    Some(chunk) => response.push_str(&chunk),
                    None => break,
                },
            }
        }
        Ok(response)
    }
}

/// The selection when there is one, otherwise the whole buffer.
fn collect_context(buffer: &dyn EditorBuffer) -> String {
    buffer
        .selected_text()
        .filter(|selection| !selection.is_empty())
        .unwrap_or_else(|| buffer.text())
}

fn construct_prompt(request: &RefactorRequest, context: &str) -> String {
    match RefactorAction::from_key(&request.action) {
        Some(action) => action.prompt(context),
        None => format!(
            "{}\nReturn a unified diff for the provided code.\n{}",
            request.prompt_hint, context
        ),
    }
}

/// Run `action` on `buffer`; the hint defaults to the action name.
pub async fn run_code_action(
    buffer: &mut dyn EditorBuffer,
    client: Arc<AiClient>,
    action: &str,
    hint: &str,
) -> Result<String, PipelineError> {
    let hint = if hint.is_empty() { action } else { hint };
    let request = RefactorRequest::new(action, hint);
    RefactorPipeline::new(client).run(buffer, &request).await
}
