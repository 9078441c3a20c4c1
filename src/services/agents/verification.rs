//! Verification Agent
//!
//! Flags conflicts that should block automatic application of patches.

use std::sync::Arc;

use async_trait::async_trait;
use ghostline_core::{AgentResult, CoreResult, SemanticGraph, SharedContext};

use super::Agent;

const SUGGESTIONS: [&str; 2] = [
    "Run formatter before applying patches",
    "Schedule fast tests after refactors",
];

pub struct VerificationAgent {
    graph: Option<Arc<dyn SemanticGraph>>,
    shared_context: Option<Arc<dyn SharedContext>>,
}

impl VerificationAgent {
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
impl Agent for VerificationAgent {
    fn name(&self) -> &str {
        "verification"
    }

    fn display_name(&self) -> &str {
        "VerificationAgent"
    }

    fn shared_context(&self) -> Option<&Arc<dyn SharedContext>> {
        self.shared_context.as_ref()
    }

    async fn run(&self, _task: &str) -> CoreResult<AgentResult> {
        let mut conflicts = Vec::new();
        if let Some(graph) = &self.graph {
            let cycles = graph.find_cycles();
            if !cycles.is_empty() {
                conflicts.push(format!("Cycle detected affecting {} paths", cycles.len()));
            }
        }

        let mut summary = "Verification complete".to_string();
        if !conflicts.is_empty() {
            summary.push_str(" with conflicts");
        }

        Ok(AgentResult::new(self.name(), conflicts.is_empty(), summary)
            .with_conflicts(conflicts)
            .with_insights(SUGGESTIONS.iter().map(|s| s.to_string()).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostline_core::{CodeGraph, GraphEdge, GraphNode};

    #[tokio::test]
    async fn test_clean_graph() {
        let agent = VerificationAgent::new(Some(Arc::new(CodeGraph::new())), None);
        let result = agent.run("x").await.unwrap();
        assert!(result.success);
        assert_eq!(result.summary, "Verification complete");
        assert!(result.conflicts.is_empty());
        assert_eq!(result.insights.len(), 2);
    }

    #[tokio::test]
    async fn test_cycles_are_conflicts() {
        let a = GraphNode::new("a", "module", "a.py");
        let b = GraphNode::new("b", "module", "b.py");
        let mut graph = CodeGraph::new();
        graph.add_edge(GraphEdge::new(a.clone(), b.clone(), "imports"));
        graph.add_edge(GraphEdge::new(b, a, "imports"));

        let agent = VerificationAgent::new(Some(Arc::new(graph)), None);
        let result = agent.run("x").await.unwrap();

        assert!(!result.success);
        assert_eq!(result.summary, "Verification complete with conflicts");
        assert_eq!(result.conflicts, vec!["Cycle detected affecting 1 paths"]);
    }

    #[tokio::test]
    async fn test_without_graph() {
        let agent = VerificationAgent::new(None, None);
        let result = agent.run("x").await.unwrap();
        assert!(result.success);
    }
}
