//! Ghostline Tools
//!
//! Command plumbing shared by the editor surfaces and the AI layer:
//! - `CommandDescriptor` - a named callback with bound arguments and optional undo/redo
//! - `CommandRegistry` - registration, lookup, execution, linear undo/redo
//! - `CommandPlan` - commands staged for approval
//! - `AiCommandAdapter` - turns AI JSON output into a staged plan

pub mod adapter;
pub mod command;
pub mod plan;
pub mod registry;

// Re-export core types
pub use adapter::{AiCommandAdapter, CommandResponse};
pub use command::{ActionCallback, CommandCallback, CommandDescriptor, CommandOutcome};
pub use plan::CommandPlan;
pub use registry::CommandRegistry;
