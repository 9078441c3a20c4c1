//! Agent Manager
//!
//! Runs every registered agent against a task on the tokio runtime, bounded
//! by a semaphore, and folds their results into a proposed plan.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use ghostline_core::{AgentResult, CoreError, SemanticGraph, SharedContext};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::{Agent, AnalysisAgent, RefactorAgent, VerificationAgent, WorkspaceSharedContext};
use crate::services::memory::WorkspaceMemory;
use crate::services::planner::LongHorizonPlanner;

/// Default number of agents allowed to run at once.
pub const DEFAULT_MAX_WORKERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentManagerConfig {
    pub max_workers: usize,
}

impl Default for AgentManagerConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

/// Flattened output of one coordination round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedPlan {
    pub patches: Vec<String>,
    pub insights: Vec<String>,
    pub conflicts: Vec<String>,
}

impl ProposedPlan {
    pub fn from_results(results: &[AgentResult]) -> Self {
        let mut plan = Self::default();
        for result in results {
            plan.patches.extend(result.patches.iter().cloned());
            plan.insights.extend(result.insights.iter().cloned());
            plan.conflicts.extend(result.conflicts.iter().cloned());
        }
        plan
    }
}

pub struct AgentManager {
    agents: RwLock<Vec<Arc<dyn Agent>>>,
    planner: Arc<LongHorizonPlanner>,
    shared_context: Arc<dyn SharedContext>,
    semaphore: Arc<Semaphore>,
    workspace_active: AtomicBool,
}

impl AgentManager {
    /// Manager with the built-in agents sharing a `WorkspaceSharedContext`.
    pub fn new(
        memory: Arc<WorkspaceMemory>,
        graph: Arc<dyn SemanticGraph>,
        config: AgentManagerConfig,
    ) -> Self {
        let context: Arc<dyn SharedContext> = Arc::new(WorkspaceSharedContext::new(
            Arc::clone(&memory),
            Arc::clone(&graph),
        ));
        Self::with_shared_context(memory, graph, context, config)
    }

    pub fn with_shared_context(
        memory: Arc<WorkspaceMemory>,
        graph: Arc<dyn SemanticGraph>,
        shared_context: Arc<dyn SharedContext>,
        config: AgentManagerConfig,
    ) -> Self {
        let planner = Arc::new(LongHorizonPlanner::new(
            Arc::clone(&memory),
            Arc::clone(&graph),
        ));
        let agents: Vec<Arc<dyn Agent>> = vec![
            Arc::new(AnalysisAgent::new(
                Some(Arc::clone(&graph)),
                Some(Arc::clone(&shared_context)),
            )),
            Arc::new(RefactorAgent::new(
                memory,
                Arc::clone(&graph),
                Some(Arc::clone(&planner)),
                Some(Arc::clone(&shared_context)),
            )),
            Arc::new(VerificationAgent::new(
                Some(graph),
                Some(Arc::clone(&shared_context)),
            )),
        ];

        Self {
            agents: RwLock::new(agents),
            planner,
            shared_context,
            semaphore: Arc::new(Semaphore::new(config.max_workers.max(1))),
            workspace_active: AtomicBool::new(false),
        }
    }

    /// Planner shared with the refactor agent.
    pub fn planner(&self) -> &Arc<LongHorizonPlanner> {
        &self.planner
    }

    pub fn shared_context(&self) -> &Arc<dyn SharedContext> {
        &self.shared_context
    }

    /// Add an agent to future coordination rounds.
    pub fn register_agent(&self, agent: Arc<dyn Agent>) {
        tracing::debug!(agent = agent.name(), "agent registered");
        self.agents
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(agent);
    }

    fn agents_snapshot(&self) -> Vec<Arc<dyn Agent>> {
        self.agents
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn agent_names(&self) -> Vec<String> {
        self.agents_snapshot()
            .iter()
            .map(|agent| agent.name().to_string())
            .collect()
    }

    /// Run every agent on `task`. Results arrive in completion order and
    /// there is always one per agent; failures become `agent-error` results.
    pub async fn coordinate(&self, task: &str) -> Vec<AgentResult> {
        let agents = self.agents_snapshot();
        let mut join_set = JoinSet::new();

        for agent in agents.iter().cloned() {
            let semaphore = Arc::clone(&self.semaphore);
            let task = task.to_string();
            join_set.spawn(async move {
                let name = agent.name().to_string();
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => agent.run(&task).await,
                    Err(_) => Err(CoreError::agent(format!(
                        "Agent pool is shut down; '{}' was not run",
                        name
                    ))),
                };
                (name, outcome)
            });
        }

        let mut results = Vec::with_capacity(agents.len());
        while let Some(joined) = join_set.join_next().await {
            let result = match joined {
                Ok((_, Ok(result))) => result,
                Ok((name, Err(e))) => {
                    tracing::error!(agent = %name, error = %e, "agent failed");
                    AgentResult::failure(e.to_string(), format!("{:?}", e))
                }
                Err(join_error) => {
                    let message = if join_error.is_panic() {
                        panic_message(join_error.into_panic())
                    } else {
                        join_error.to_string()
                    };
                    tracing::error!(error = %message, "agent task aborted");
                    AgentResult::failure(message.clone(), format!("JoinError({})", message))
                }
            };
            results.push(result);
        }

        tracing::debug!(task, results = results.len(), "coordination round finished");
        results
    }

    pub async fn propose_plan(&self, task: &str) -> ProposedPlan {
        ProposedPlan::from_results(&self.coordinate(task).await)
    }

    /// Close the worker pool. In-flight agents are not awaited.
    pub fn shutdown(&self) {
        tracing::info!("agent pool shut down");
        self.semaphore.close();
    }

    pub fn is_shutdown(&self) -> bool {
        self.semaphore.is_closed()
    }

    pub fn set_workspace_active(&self, active: bool) {
        self.workspace_active.store(active, Ordering::Relaxed);
    }

    /// One `"<AgentName>: ready|idle"` line per agent.
    pub fn agent_status(&self) -> Vec<String> {
        let state = if self.workspace_active.load(Ordering::Relaxed) {
            "ready"
        } else {
            "idle"
        };
        self.agents_snapshot()
            .iter()
            .map(|agent| format!("{}: {}", agent.display_name(), state))
            .collect()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "agent panicked".to_string()
    }
}
