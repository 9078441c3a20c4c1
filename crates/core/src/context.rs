//! Shared Context
//!
//! A read-only capability handed to every agent for the duration of one
//! coordination round. Agents may take snapshots but never mutate the
//! underlying state through this trait.

use serde_json::{Map, Value};

// ============================================================================
// SharedContext Trait
// ============================================================================

/// Read-only provider of workspace state shared across agents.
///
/// Implementations must be cheap to snapshot and safe to call from several
/// agent tasks at once.
pub trait SharedContext: Send + Sync {
    /// Returns a point-in-time view of the shared state (memory contents,
    /// graph fingerprint, ...).
    fn snapshot(&self) -> Map<String, Value>;
}

// ============================================================================
// StaticContext
// ============================================================================

/// A `SharedContext` backed by a fixed map.
///
/// Useful for callers that precompute the snapshot once per round, and for
/// tests.
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    values: Map<String, Value>,
}

impl StaticContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to the context.
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }
}

impl From<Map<String, Value>> for StaticContext {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl SharedContext for StaticContext {
    fn snapshot(&self) -> Map<String, Value> {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_static_context_snapshot() {
        let ctx = StaticContext::new()
            .with_value("graph", Value::String("Modules: a".to_string()))
            .with_value("memory", serde_json::json!({"commit_messages": ["init"]}));

        let snapshot = ctx.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["graph"], "Modules: a");
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let ctx = StaticContext::new().with_value("k", Value::Bool(true));
        let mut snapshot = ctx.snapshot();
        snapshot.insert("extra".to_string(), Value::Null);
        assert_eq!(ctx.snapshot().len(), 1);
    }

    #[test]
    fn test_context_as_trait_object() {
        let ctx: Arc<dyn SharedContext> = Arc::new(StaticContext::default());
        assert!(ctx.snapshot().is_empty());
    }
}
