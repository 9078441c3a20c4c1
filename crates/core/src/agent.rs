//! Agent Result Envelope
//!
//! The output of one agent run. Built once by the agent and handed to the
//! coordinator for aggregation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Agent name used for results synthesized from a failed agent run.
pub const AGENT_ERROR_NAME: &str = "agent-error";

/// Standard envelope for agent outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent_name: String,
    pub success: bool,
    /// Human-readable one-line summary
    pub summary: String,
    #[serde(default)]
    pub patches: Vec<String>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    #[serde(default)]
    pub diagnostics: Map<String, Value>,
}

impl AgentResult {
    /// Create a result with empty lists and diagnostics.
    pub fn new(agent_name: impl Into<String>, success: bool, summary: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            success,
            summary: summary.into(),
            patches: Vec::new(),
            insights: Vec::new(),
            conflicts: Vec::new(),
            diagnostics: Map::new(),
        }
    }

    /// Degraded result standing in for an agent that failed to run.
    pub fn failure(message: impl Into<String>, exception: impl Into<String>) -> Self {
        let mut result = Self::new(AGENT_ERROR_NAME, false, message);
        result
            .diagnostics
            .insert("exception".to_string(), Value::String(exception.into()));
        result
    }

    pub fn with_patches(mut self, patches: Vec<String>) -> Self {
        self.patches = patches;
        self
    }

    pub fn with_insights(mut self, insights: Vec<String>) -> Self {
        self.insights = insights;
        self
    }

    pub fn with_conflicts(mut self, conflicts: Vec<String>) -> Self {
        self.conflicts = conflicts;
        self
    }

    pub fn with_diagnostic(mut self, key: impl Into<String>, value: Value) -> Self {
        self.diagnostics.insert(key.into(), value);
        self
    }

    /// Whether this result was synthesized from an agent failure.
    pub fn is_agent_error(&self) -> bool {
        self.agent_name == AGENT_ERROR_NAME
    }
}
