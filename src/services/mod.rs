//! Business Logic Services
//!
//! Agents, planning, prompt composition, refactor pipelines and workspace
//! memory.

pub mod agents;
pub mod memory;
pub mod planner;
pub mod prompt_builder;
pub mod refactor;
