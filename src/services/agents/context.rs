//! Workspace Shared Context
//!
//! Default `SharedContext` handed to the built-in agents.

use std::sync::Arc;

use ghostline_core::{SemanticGraph, SharedContext};
use serde_json::{Map, Value};

use crate::services::memory::WorkspaceMemory;

/// Shares workspace memory and the graph fingerprint across agents.
pub struct WorkspaceSharedContext {
    memory: Arc<WorkspaceMemory>,
    graph: Arc<dyn SemanticGraph>,
}

impl WorkspaceSharedContext {
    pub fn new(memory: Arc<WorkspaceMemory>, graph: Arc<dyn SemanticGraph>) -> Self {
        Self { memory, graph }
    }
}

impl SharedContext for WorkspaceSharedContext {
    fn snapshot(&self) -> Map<String, Value> {
        let mut snapshot = Map::new();
        snapshot.insert("memory".to_string(), Value::Object(self.memory.snapshot()));
        snapshot.insert(
            "graph".to_string(),
            Value::String(self.graph.pattern_fingerprint()),
        );
        snapshot
    }
}
