//! Integration Tests Module
//!
//! Tests cover agent coordination, unified diff application through the
//! refactor pipeline, and command registry undo/redo.

// Agent coordination and planner tests
mod agents_test;

// Unified diff and refactor pipeline tests
mod diff_test;

// Command registry, plans and AI command adapter tests
mod commands_test;
