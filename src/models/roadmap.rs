//! Roadmap Models
//!
//! Planner cards and refactor proposals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Estimated effort of a roadmap card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Low => "low",
            Difficulty::Medium => "medium",
            Difficulty::High => "high",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured suggestion produced by the long-horizon planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapCard {
    pub title: String,
    pub summary: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub related_modules: Vec<String>,
}

impl RoadmapCard {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        difficulty: Difficulty,
        steps: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            difficulty,
            steps,
            related_modules: Vec::new(),
        }
    }

    pub fn with_related_modules(mut self, modules: Vec<String>) -> Self {
        self.related_modules = modules;
        self
    }
}

fn default_risk() -> String {
    "medium".to_string()
}

/// Refactor suggestion emitted by the refactor agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchProposal {
    pub description: String,
    pub files: Vec<String>,
    #[serde(default = "default_risk")]
    pub risk: String,
}

impl PatchProposal {
    /// Proposal with the default `medium` risk.
    pub fn new(description: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            description: description.into(),
            files,
            risk: default_risk(),
        }
    }

    pub fn with_risk(mut self, risk: impl Into<String>) -> Self {
        self.risk = risk.into();
        self
    }
}
