//! Refactor Agent
//!
//! Proposes patches for high-churn modules and pulls roadmap forecasts from
//! the long-horizon planner.

use std::sync::Arc;

use async_trait::async_trait;
use ghostline_core::{churn_hotspots, AgentResult, CoreResult, SemanticGraph, SharedContext};
use serde_json::Value;

use super::Agent;
use crate::models::roadmap::PatchProposal;
use crate::services::memory::WorkspaceMemory;
use crate::services::planner::{LongHorizonPlanner, HOTSPOT_LIMIT};

/// Source suffix of the workspace language.
const MODULE_SUFFIX: &str = ".py";

pub struct RefactorAgent {
    graph: Arc<dyn SemanticGraph>,
    planner: Arc<LongHorizonPlanner>,
    shared_context: Option<Arc<dyn SharedContext>>,
}

impl RefactorAgent {
    /// Without a `planner`, one is built over `memory` and `graph`.
    pub fn new(
        memory: Arc<WorkspaceMemory>,
        graph: Arc<dyn SemanticGraph>,
        planner: Option<Arc<LongHorizonPlanner>>,
        shared_context: Option<Arc<dyn SharedContext>>,
    ) -> Self {
        let planner = planner
            .unwrap_or_else(|| Arc::new(LongHorizonPlanner::new(memory, Arc::clone(&graph))));
        Self {
            graph,
            planner,
            shared_context,
        }
    }

    pub fn planner(&self) -> &Arc<LongHorizonPlanner> {
        &self.planner
    }

    /// Patch suggestions for the hottest modules, or a codemod sweep when
    /// the graph has none.
    pub fn propose_from_task(&self, task: &str) -> Vec<PatchProposal> {
        let proposals: Vec<PatchProposal> = churn_hotspots(self.graph.as_ref(), HOTSPOT_LIMIT)
            .into_iter()
            .map(|(module, _)| {
                PatchProposal::new(
                    format!("Split high-churn module {} for task '{}'", module, task),
                    vec![format!("{}{}", module, MODULE_SUFFIX)],
                )
                .with_risk("high")
            })
            .collect();

        if proposals.is_empty() {
            return vec![PatchProposal::new(
                format!("Codemod sweep aligned to '{}'", task),
                Vec::new(),
            )];
        }
        proposals
    }

    /// Branch names for evolution themes, e.g. `Async IO` -> `evolve/async_io`.
    pub fn propose_evolution_branches<I, S>(&self, themes: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        themes
            .into_iter()
            .map(|theme| format!("evolve/{}", theme.as_ref().replace(' ', "_").to_lowercase()))
            .collect()
    }
}

#[async_trait]
impl Agent for RefactorAgent {
    fn name(&self) -> &str {
        "refactor"
    }

    fn display_name(&self) -> &str {
        "RefactorAgent"
    }

    fn shared_context(&self) -> Option<&Arc<dyn SharedContext>> {
        self.shared_context.as_ref()
    }

    async fn run(&self, task: &str) -> CoreResult<AgentResult> {
        let proposals = self.propose_from_task(task);
        let roadmap = self.planner.forecast_moves();

        let mut patches: Vec<String> = proposals.iter().map(|p| p.description.clone()).collect();
        patches.extend(roadmap.iter().map(|card| format!("Roadmap: {}", card.title)));
        let insights = roadmap.iter().map(|card| card.summary.clone()).collect();

        let proposals = serde_json::to_value(&proposals)?;
        Ok(AgentResult::new(
            self.name(),
            true,
            format!("Refactor proposals ready for '{}'", task),
        )
        .with_patches(patches)
        .with_insights(insights)
        .with_diagnostic("proposals", proposals))
    }
}
