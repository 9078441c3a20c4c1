//! Ghostline Studio - Headless Core Library
//!
//! This library provides the editor-independent backend of Ghostline Studio.
//! It includes:
//! - Multi-agent coordination and the long-horizon planner
//! - AI-assisted refactors applied through unified diffs
//! - Workspace memory and prompt composition
//! - Storage (JSON config) and data models

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::roadmap::{Difficulty, PatchProposal, RoadmapCard};
pub use models::settings::{AppConfig, SettingsUpdate};
pub use services::agents::{Agent, AgentManager, AgentManagerConfig, ProposedPlan};
pub use services::memory::WorkspaceMemory;
pub use services::planner::LongHorizonPlanner;
pub use services::prompt_builder::{PromptBuilder, PromptMode};
pub use services::refactor::{
    EditorBuffer, PatchApplicationError, RefactorPipeline, TextBuffer, UnifiedDiffApplier,
};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
