//! Long-Horizon Planner
//!
//! Turns workspace memory and semantic-graph churn into roadmap cards, and
//! records which cards the user accepted.
//!
//! `forecast_moves` replaces the card list; `propose_action_tree` and
//! `propose_evolution` append to it.

use std::sync::{Arc, Mutex, MutexGuard};

use ghostline_core::{churn_hotspots, SemanticGraph};
use serde_json::json;

use crate::models::roadmap::{Difficulty, RoadmapCard};
use crate::services::memory::WorkspaceMemory;
use crate::utils::error::AppResult;

/// Number of high-churn modules considered by forecasts.
pub const HOTSPOT_LIMIT: usize = 3;

pub struct LongHorizonPlanner {
    memory: Arc<WorkspaceMemory>,
    graph: Arc<dyn SemanticGraph>,
    cards: Mutex<Vec<RoadmapCard>>,
}

impl LongHorizonPlanner {
    pub fn new(memory: Arc<WorkspaceMemory>, graph: Arc<dyn SemanticGraph>) -> Self {
        Self {
            memory,
            graph,
            cards: Mutex::new(Vec::new()),
        }
    }

    fn lock_cards(&self) -> MutexGuard<'_, Vec<RoadmapCard>> {
        self.cards.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Remember recent commit messages and the current graph fingerprint.
    pub fn analyse_history<I, S>(&self, commit_messages: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for message in commit_messages {
            self.memory.remember_pattern("commit_messages", message.as_ref())?;
        }
        self.memory
            .remember_pattern("graph_fingerprint", &self.graph.pattern_fingerprint())
    }

    /// Forecast refactors from module churn. Replaces the current cards.
    pub fn forecast_moves(&self) -> Vec<RoadmapCard> {
        let modules: Vec<String> = churn_hotspots(self.graph.as_ref(), HOTSPOT_LIMIT)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        let steps = modules
            .iter()
            .map(|name| format!("Audit high-churn module {}", name))
            .collect();

        let card = RoadmapCard::new(
            "Stabilise high-churn modules",
            "Modules with heavy symbol counts may benefit from splitting or renaming.",
            Difficulty::Medium,
            steps,
        )
        .with_related_modules(modules);

        let mut cards = self.lock_cards();
        *cards = vec![card];
        tracing::debug!(hotspots = cards[0].related_modules.len(), "forecast refreshed");
        cards.clone()
    }

    /// Multi-step plan for a refactor hint. Appended to the cards.
    pub fn propose_action_tree(&self, hint: &str) -> RoadmapCard {
        let steps = vec![
            format!("Evaluate current usages of {}", hint),
            format!("Draft extraction plan for {}", hint),
            "Coordinate test updates with testing panel".to_string(),
            "Schedule rollout across branches".to_string(),
        ];
        let card = RoadmapCard::new(
            format!("Plan: {}", hint),
            "Multi-step action tree prepared by the planner.",
            Difficulty::High,
            steps,
        )
        .with_related_modules(self.graph.module_map().into_keys().collect());

        self.lock_cards().push(card.clone());
        card
    }

    /// Two-phase migration for `target`. Both cards are appended.
    pub fn propose_evolution(&self, target: &str) -> Vec<RoadmapCard> {
        let migrations = vec![
            RoadmapCard::new(
                format!("Phase 1: audit {}", target),
                "Collect metrics and guardrails before migration.",
                Difficulty::Medium,
                to_strings(&[
                    "Capture runtime traces",
                    "Pin failing tests",
                    "Freeze API contracts",
                ]),
            ),
            RoadmapCard::new(
                format!("Phase 2: modernise {}", target),
                "Introduce async/class conversions where low risk.",
                Difficulty::High,
                to_strings(&[
                    "Convert blocking flows to async",
                    "Extract brittle functions into classes",
                    "Add compatibility shims",
                ]),
            ),
        ];

        self.lock_cards().extend(migrations.iter().cloned());
        migrations
    }

    /// Store the user's verdict on a card under the `roadmap` category.
    pub fn record_outcome(&self, card: &RoadmapCard, accepted: bool) -> AppResult<()> {
        let event = json!({
            "card": card.title,
            "accepted": accepted,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        tracing::info!(card = %card.title, accepted, "roadmap outcome recorded");
        self.memory.append_event("roadmap", event)
    }

    /// Text feed of the current cards for roadmap panels.
    pub fn roadmap_feed(&self) -> String {
        let cards = self.lock_cards();
        if cards.is_empty() {
            return "Planner has not produced roadmap cards yet.".to_string();
        }

        let mut lines = Vec::new();
        for card in cards.iter() {
            lines.push(format!("- {} [{}]", card.title, card.difficulty));
            for step in &card.steps {
                lines.push(format!("  • {}", step));
            }
        }
        lines.join("\n")
    }

    pub fn cards(&self) -> Vec<RoadmapCard> {
        self.lock_cards().clone()
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
