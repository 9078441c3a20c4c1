//! Multi-Agent System
//!
//! Specialised agents that each look at a task from one angle, and the
//! `AgentManager` that runs them concurrently and merges their output.
//!
//! ## Module Structure
//!
//! - `context` - `WorkspaceSharedContext` (memory snapshot + graph fingerprint)
//! - `analysis` - graph-wide analysis
//! - `refactor` - refactor proposals and roadmap forecasts
//! - `verification` - conflict checks
//! - `manager` - bounded concurrent coordination

pub mod analysis;
pub mod context;
pub mod manager;
pub mod refactor;
pub mod verification;

use std::sync::Arc;

use async_trait::async_trait;
use ghostline_core::{AgentResult, CoreResult, SharedContext};
use serde_json::{Map, Value};

pub use analysis::AnalysisAgent;
pub use context::WorkspaceSharedContext;
pub use manager::{AgentManager, AgentManagerConfig, ProposedPlan};
pub use refactor::RefactorAgent;
pub use verification::VerificationAgent;

// ============================================================================
// Agent Trait
// ============================================================================

/// Common contract for agents run by the [`AgentManager`].
#[async_trait]
pub trait Agent: Send + Sync {
    /// Short identifier reported in results, e.g. `analysis`.
    fn name(&self) -> &str;

    /// Name shown in status views, e.g. `AnalysisAgent`.
    fn display_name(&self) -> &str;

    /// Context shared with the other agents of a round.
    fn shared_context(&self) -> Option<&Arc<dyn SharedContext>> {
        None
    }

    /// Snapshot of the shared context, or an empty map without one.
    fn describe_context(&self) -> Map<String, Value> {
        self.shared_context()
            .map(|ctx| ctx.snapshot())
            .unwrap_or_default()
    }

    /// Handle one task description.
    async fn run(&self, task: &str) -> CoreResult<AgentResult>;
}
