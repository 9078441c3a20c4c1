//! Agent Coordination Integration Tests
//!
//! Exercises the agent manager end to end with real workspace memory.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ghostline_core::{
    AgentResult, CodeGraph, CoreError, CoreResult, GraphEdge, GraphNode, SemanticGraph,
    SharedContext, StaticContext, AGENT_ERROR_NAME,
};
use ghostline_studio::services::agents::{Agent, AgentManager, AgentManagerConfig};
use ghostline_studio::WorkspaceMemory;
use serde_json::json;

// ============================================================================
// Helpers
// ============================================================================

fn cyclic_graph() -> Arc<dyn SemanticGraph> {
    let api = GraphNode::new("api", "module", "api.py");
    let db = GraphNode::new("db", "module", "db.py");
    let mut graph = CodeGraph::new();
    for (name, file) in [("get", "api.py"), ("post", "api.py"), ("query", "db.py")] {
        graph.add_node(GraphNode::new(name, "function", file));
    }
    graph.add_edge(GraphEdge::new(api.clone(), db.clone(), "imports"));
    graph.add_edge(GraphEdge::new(db, api, "imports"));
    Arc::new(graph)
}

fn manager_with(
    graph: Arc<dyn SemanticGraph>,
    max_workers: usize,
) -> (tempfile::TempDir, Arc<WorkspaceMemory>, AgentManager) {
    let dir = tempfile::tempdir().unwrap();
    let memory = Arc::new(WorkspaceMemory::open(dir.path().join("memory.json")));
    let manager = AgentManager::new(
        Arc::clone(&memory),
        graph,
        AgentManagerConfig { max_workers },
    );
    (dir, memory, manager)
}

/// Tracks how many instances run at once.
struct SlowAgent {
    id: String,
    running: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

#[async_trait]
impl Agent for SlowAgent {
    fn name(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        "SlowAgent"
    }

    async fn run(&self, task: &str) -> CoreResult<AgentResult> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(AgentResult::new(self.id.clone(), true, format!("done {}", task)))
    }
}

struct BrokenAgent;

#[async_trait]
impl Agent for BrokenAgent {
    fn name(&self) -> &str {
        "broken"
    }

    fn display_name(&self) -> &str {
        "BrokenAgent"
    }

    async fn run(&self, _task: &str) -> CoreResult<AgentResult> {
        Err(CoreError::agent("graph unavailable"))
    }
}

// ============================================================================
// Coordination
// ============================================================================

#[tokio::test]
async fn test_one_result_per_agent_with_failures() {
    let (_dir, _memory, manager) = manager_with(cyclic_graph(), 4);
    manager.register_agent(Arc::new(BrokenAgent));

    let results = manager.coordinate("split api").await;
    assert_eq!(results.len(), 4);

    let errors: Vec<_> = results.iter().filter(|r| r.agent_name == AGENT_ERROR_NAME).collect();
    assert_eq!(errors.len(), 1);
    assert!(!errors[0].success);
    assert!(errors[0].summary.contains("graph unavailable"));

    let analysis = results.iter().find(|r| r.agent_name == "analysis").unwrap();
    assert!(analysis.success);
    assert!(analysis.insights.contains(&"Potential cycles: 1".to_string()));
}

#[tokio::test]
async fn test_worker_limit_is_respected() {
    let (_dir, _memory, manager) = manager_with(Arc::new(CodeGraph::new()), 2);
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    for i in 0..6 {
        manager.register_agent(Arc::new(SlowAgent {
            id: format!("slow-{}", i),
            running: Arc::clone(&running),
            peak: Arc::clone(&peak),
        }));
    }

    let results = manager.coordinate("wait").await;
    assert_eq!(results.len(), 9);
    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert!(peak.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn test_registration_affects_future_rounds_only() {
    let (_dir, _memory, manager) = manager_with(Arc::new(CodeGraph::new()), 4);
    assert_eq!(manager.coordinate("a").await.len(), 3);
    manager.register_agent(Arc::new(BrokenAgent));
    assert_eq!(manager.coordinate("b").await.len(), 4);
}

#[tokio::test]
async fn test_plan_collects_conflicts_and_roadmap() {
    let (_dir, _memory, manager) = manager_with(cyclic_graph(), 4);
    let plan = manager.propose_plan("split api").await;

    assert!(plan
        .patches
        .contains(&"Split high-churn module api for task 'split api'".to_string()));
    assert!(plan
        .patches
        .contains(&"Roadmap: Stabilise high-churn modules".to_string()));
    assert_eq!(plan.conflicts, vec!["Cycle detected affecting 1 paths"]);
    assert!(plan
        .insights
        .contains(&"Run formatter before applying patches".to_string()));
}

#[tokio::test]
async fn test_shutdown_degrades_every_agent() {
    let (_dir, _memory, manager) = manager_with(Arc::new(CodeGraph::new()), 4);
    manager.shutdown();

    let results = manager.coordinate("late").await;
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.is_agent_error()));

    let plan = manager.propose_plan("late").await;
    assert!(plan.patches.is_empty());
}

#[tokio::test]
async fn test_custom_shared_context_reaches_agents() {
    let dir = tempfile::tempdir().unwrap();
    let memory = Arc::new(WorkspaceMemory::open(dir.path().join("memory.json")));
    let context = Arc::new(StaticContext::new().with_value("branch", json!("main")));
    let manager = AgentManager::with_shared_context(
        memory,
        Arc::new(CodeGraph::new()),
        context,
        AgentManagerConfig::default(),
    );

    assert_eq!(manager.shared_context().snapshot()["branch"], "main");
    let results = manager.coordinate("x").await;
    let analysis = results.iter().find(|r| r.agent_name == "analysis").unwrap();
    assert!(analysis
        .insights
        .contains(&"Context captured for downstream agents.".to_string()));
}

// ============================================================================
// Planner + Memory
// ============================================================================

#[tokio::test]
async fn test_roadmap_outcomes_persist_across_reload() {
    let (dir, memory, manager) = manager_with(cyclic_graph(), 4);
    let cards = manager.planner().forecast_moves();
    manager.planner().record_outcome(&cards[0], true).unwrap();
    memory.remember_pattern("style", "black").unwrap();
    memory.remember_pattern("style", "black").unwrap();

    let reloaded = WorkspaceMemory::open(dir.path().join("memory.json"));
    assert_eq!(reloaded.patterns("style"), vec!["black"]);
    let snapshot = reloaded.snapshot();
    let events = snapshot["roadmap"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["card"], "Stabilise high-churn modules");
}
