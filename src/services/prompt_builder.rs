//! Prompt Builder
//!
//! Merges the semantic-graph fingerprint, workspace memory, and the previous
//! AI response into the prompt sent to the backend.

use std::str::FromStr;
use std::sync::Arc;

use ghostline_core::SemanticGraph;
use serde::{Deserialize, Serialize};

use crate::services::memory::WorkspaceMemory;

/// Placeholder for AST excerpts until a parser feeds real fragments.
const AST_PLACEHOLDER: &str = "(AST fragments omitted in stub)";

/// Layout of the composed prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    #[default]
    Sequential,
    Parallel,
    Cascade,
}

impl FromStr for PromptMode {
    type Err = std::convert::Infallible;

    /// Only the exact lowercase names match; anything else is `Sequential`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "parallel" => PromptMode::Parallel,
            "cascade" => PromptMode::Cascade,
            _ => PromptMode::Sequential,
        })
    }
}

/// Context blocks gathered for one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptSegments {
    pub semantic: String,
    pub memory: String,
    pub ast: String,
    pub last_response: String,
}

impl PromptSegments {
    /// Non-empty blocks joined by blank lines.
    pub fn merge(&self) -> String {
        [&self.semantic, &self.memory, &self.ast, &self.last_response]
            .into_iter()
            .filter(|block| !block.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Default)]
pub struct PromptBuilder {
    memory: Option<Arc<WorkspaceMemory>>,
    graph: Option<Arc<dyn SemanticGraph>>,
    last_ai_response: String,
}

impl PromptBuilder {
    pub fn new(memory: Option<Arc<WorkspaceMemory>>, graph: Option<Arc<dyn SemanticGraph>>) -> Self {
        Self {
            memory,
            graph,
            last_ai_response: String::new(),
        }
    }

    pub fn segments(&self) -> PromptSegments {
        PromptSegments {
            semantic: self.semantic_block(),
            memory: self.memory_block(),
            ast: AST_PLACEHOLDER.to_string(),
            last_response: self.last_ai_response.clone(),
        }
    }

    pub fn build(&self, user_prompt: &str, mode: PromptMode) -> String {
        let segments = self.segments();
        match mode {
            PromptMode::Parallel => {
                format!("[PARALLEL]\n{}\n\nUser: {}", segments.merge(), user_prompt)
            }
            PromptMode::Cascade => format!(
                "[CASCADE]\n{}\n{}\nUser: {}",
                segments.memory, segments.semantic, user_prompt
            ),
            PromptMode::Sequential => format!("{}\n\nUser: {}", segments.merge(), user_prompt),
        }
    }

    /// Prompt for autoflow predictions: the intent followed by the planned
    /// step chain.
    pub fn build_autoflow_prompt<S: AsRef<str>>(&self, intent: &str, steps: &[S]) -> String {
        let chain = steps
            .iter()
            .map(|step| format!("- {}", step.as_ref()))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Autoflow intent: {}\n{}\n{}\nPlanned chain:\n{}",
            intent,
            self.semantic_block(),
            self.memory_block(),
            chain
        )
    }

    /// Overwrite the remembered AI response.
    pub fn update_last_response(&mut self, text: impl Into<String>) {
        self.last_ai_response = text.into();
    }

    pub fn last_response(&self) -> &str {
        &self.last_ai_response
    }

    fn semantic_block(&self) -> String {
        match &self.graph {
            Some(graph) => format!("Semantic graph fingerprint:\n{}", graph.pattern_fingerprint()),
            None => String::new(),
        }
    }

    fn memory_block(&self) -> String {
        self.memory
            .as_ref()
            .map(|m| m.as_prompt_context())
            .unwrap_or_default()
    }
}
