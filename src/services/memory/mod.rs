//! Workspace Memory
//!
//! Project-level memory fed into prompts, agents, and the planner.
//!
//! ## Module Structure
//!
//! - `workspace` - `WorkspaceMemory`, a category → list store persisted as JSON

pub mod workspace;

pub use workspace::WorkspaceMemory;
