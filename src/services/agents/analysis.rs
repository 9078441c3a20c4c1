//! Analysis Agent
//!
//! Surfaces graph-wide facts (fingerprint, cycles) for the other agents.

use std::sync::Arc;

use async_trait::async_trait;
use ghostline_core::{AgentResult, CoreResult, SemanticGraph, SharedContext};
use serde_json::Value;

use super::Agent;

pub struct AnalysisAgent {
    graph: Option<Arc<dyn SemanticGraph>>,
    shared_context: Option<Arc<dyn SharedContext>>,
}

impl AnalysisAgent {
    pub fn new(
        graph: Option<Arc<dyn SemanticGraph>>,
        shared_context: Option<Arc<dyn SharedContext>>,
    ) -> Self {
        Self {
            graph,
            shared_context,
        }
    }
}

#[async_trait]
impl Agent for AnalysisAgent {
    fn name(&self) -> &str {
        "analysis"
    }

    fn display_name(&self) -> &str {
        "AnalysisAgent"
    }

    fn shared_context(&self) -> Option<&Arc<dyn SharedContext>> {
        self.shared_context.as_ref()
    }

    async fn run(&self, task: &str) -> CoreResult<AgentResult> {
        let (fingerprint, mut insights) = match &self.graph {
            Some(graph) => (
                Value::String(graph.pattern_fingerprint()),
                vec![
                    format!("Graph fingerprint ready for '{}'.", task),
                    format!("Potential cycles: {}", graph.find_cycles().len()),
                ],
            ),
            None => (
                Value::Null,
                vec!["Semantic graph not available; using shared context only.".to_string()],
            ),
        };
        if self.shared_context.is_some() {
            insights.push("Context captured for downstream agents.".to_string());
        }

        Ok(AgentResult::new(self.name(), true, "Semantic analysis complete")
            .with_insights(insights)
            .with_diagnostic("fingerprint", fingerprint))
    }
}
