//! Command Registry Integration Tests
//!
//! Registry replacement, filtering, undo/redo symmetry, and AI-staged plans.

use std::sync::{Arc, Mutex};

use ghostline_core::CoreError;
use ghostline_tools::{AiCommandAdapter, CommandDescriptor, CommandPlan, CommandRegistry};
use serde_json::json;

/// Shared log written by command callbacks.
type Log = Arc<Mutex<Vec<String>>>;

fn logging_command(id: &str, description: &str, log: &Log) -> CommandDescriptor {
    let (run_log, undo_log) = (Arc::clone(log), Arc::clone(log));
    let run_id = id.to_string();
    let undo_id = id.to_string();
    CommandDescriptor::new(id, description, move |args| {
        let suffix = args
            .get("path")
            .and_then(|v| v.as_str())
            .map(|p| format!(":{}", p))
            .unwrap_or_default();
        run_log.lock().unwrap().push(format!("run {}{}", run_id, suffix));
        Ok(())
    })
    .with_undo(move |_| {
        undo_log.lock().unwrap().push(format!("undo {}", undo_id));
        Ok(())
    })
}

#[test]
fn test_register_replaces_same_id() {
    let log = Log::default();
    let mut registry = CommandRegistry::new();
    registry.register_command(logging_command("format", "Format file", &log));
    registry.register_command(logging_command("format", "Format with black", &log));

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("format").unwrap().description, "Format with black");
}

#[test]
fn test_list_filters_case_insensitively() {
    let log = Log::default();
    let mut registry = CommandRegistry::new();
    registry.register_command(logging_command("git.commit", "Commit staged changes", &log));
    registry.register_command(logging_command("format", "Format File", &log));

    let ids = |filter: Option<&str>| -> Vec<String> {
        registry
            .list_commands(filter)
            .iter()
            .map(|c| c.id.clone())
            .collect()
    };
    assert_eq!(ids(Some("GIT")), vec!["git.commit"]);
    assert_eq!(ids(Some("file")), vec!["format"]);
    assert_eq!(ids(None).len(), 2);
}

#[test]
fn test_undo_redo_symmetry() {
    let log = Log::default();
    let mut registry = CommandRegistry::new();
    registry.register_command(logging_command("format", "Format", &log));

    registry.execute_by_id("format").unwrap();
    assert!(registry.can_undo());
    assert!(!registry.can_redo());

    assert!(registry.undo_last().unwrap());
    assert!(registry.can_redo());
    assert!(registry.redo_last().unwrap());
    assert!(registry.can_undo());
    assert!(!registry.can_redo());

    // Nothing left to redo
    assert!(!registry.redo_last().unwrap());

    assert_eq!(
        *log.lock().unwrap(),
        vec!["run format", "undo format", "run format"]
    );
}

#[test]
fn test_execute_clears_redo_stack() {
    let log = Log::default();
    let mut registry = CommandRegistry::new();
    registry.register_command(logging_command("a", "A", &log));

    registry.execute_by_id("a").unwrap();
    registry.undo_last().unwrap();
    assert!(registry.can_redo());

    registry.execute_by_id("a").unwrap();
    assert!(!registry.can_redo());
}

#[test]
fn test_unknown_command() {
    let mut registry = CommandRegistry::new();
    let err = registry.execute_by_id("nope").unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[test]
fn test_ai_response_staged_then_approved() {
    let log = Log::default();
    let mut registry = CommandRegistry::new();
    registry.register_command(logging_command("open", "Open file", &log));
    registry.register_command(logging_command("format", "Format file", &log));

    let mut plan = CommandPlan::new();
    let response = json!({
        "commands": [
            {"command": "open", "args": {"path": "main.py"}},
            {"command": "unknown"},
            {"id": "format"}
        ]
    })
    .to_string();
    assert_eq!(
        AiCommandAdapter::handle_response(&registry, &mut plan, response.as_str()),
        2
    );

    assert_eq!(plan.approve_all(&mut registry).unwrap(), 2);
    assert!(plan.is_empty());
    assert_eq!(*log.lock().unwrap(), vec!["run open:main.py", "run format"]);
}

#[test]
fn test_malformed_response_keeps_plan() {
    let registry = CommandRegistry::new();
    let mut plan = CommandPlan::new();
    assert_eq!(
        AiCommandAdapter::handle_response(&registry, &mut plan, "not json at all"),
        0
    );
    assert!(plan.is_empty());
}

#[test]
fn test_echo_without_change_leaves_undo_target() {
    let log = Log::default();
    let mut registry = CommandRegistry::new();
    registry.register_command(logging_command("format", "Format file", &log));
    let echo_log = Arc::clone(&log);
    registry.register_command(
        CommandDescriptor::new("echo", "Echo selection", move |args| {
            echo_log.lock().unwrap().push("echo".to_string());
            Ok(args.contains_key("replace"))
        })
        .with_undo(|_| Ok(())),
    );

    registry.execute_by_id("format").unwrap();
    registry.execute_by_id("echo").unwrap();
    assert!(registry.undo_last().unwrap());

    assert_eq!(
        *log.lock().unwrap(),
        vec!["run format", "echo", "undo format"]
    );
    assert!(!registry.can_undo());
}
