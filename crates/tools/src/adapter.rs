//! AI Command Adapter
//!
//! Maps AI output into registered commands staged on a [`CommandPlan`].
//!
//! Accepted shapes:
//! - `{"commands": [...]}` or `{"plan": [...]}`
//! - a bare list of entries
//! - either of the above as JSON text
//!
//! Each entry names a command with `command` (or `id`) and may carry `args`
//! and `side_effects`. Anything that does not parse is ignored.

use serde_json::{Map, Value};

use crate::command::CommandDescriptor;
use crate::plan::CommandPlan;
use crate::registry::CommandRegistry;

/// Raw AI output handed to the adapter.
#[derive(Debug, Clone)]
pub enum CommandResponse {
    Text(String),
    Object(Map<String, Value>),
    Entries(Vec<Value>),
}

impl From<&str> for CommandResponse {
    fn from(text: &str) -> Self {
        CommandResponse::Text(text.to_string())
    }
}

impl From<String> for CommandResponse {
    fn from(text: String) -> Self {
        CommandResponse::Text(text)
    }
}

impl From<Value> for CommandResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => CommandResponse::Object(map),
            Value::Array(entries) => CommandResponse::Entries(entries),
            Value::String(text) => CommandResponse::Text(text),
            other => CommandResponse::Text(other.to_string()),
        }
    }
}

pub struct AiCommandAdapter;

impl AiCommandAdapter {
    /// Stage the commands found in `response` on `plan`.
    ///
    /// The plan is only replaced when at least one registered command was
    /// found. Returns the number of staged commands.
    pub fn handle_response(
        registry: &CommandRegistry,
        plan: &mut CommandPlan,
        response: impl Into<CommandResponse>,
    ) -> usize {
        let planned = Self::resolve(registry, response.into());
        let count = planned.len();
        if count > 0 {
            tracing::info!(count, "staging AI command plan");
            plan.set_commands(planned);
        }
        count
    }

    /// Bind every usable entry of `response` to its registered descriptor.
    pub fn resolve(registry: &CommandRegistry, response: CommandResponse) -> Vec<CommandDescriptor> {
        extract_entries(response)
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|entry| bind_entry(registry, entry))
            .collect()
    }
}

fn extract_entries(response: CommandResponse) -> Vec<Value> {
    let payload = match response {
        CommandResponse::Entries(entries) => return entries,
        CommandResponse::Object(map) => non_empty(map.get("commands"))
            .or_else(|| map.get("plan"))
            .cloned(),
        CommandResponse::Text(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map.get("commands").cloned(),
            Ok(other) => Some(other),
            Err(e) => {
                tracing::debug!(error = %e, "AI response is not JSON; no commands staged");
                None
            }
        },
    };

    match payload {
        Some(Value::Array(entries)) => entries,
        _ => Vec::new(),
    }
}

/// `None`, `null`, empty lists and empty objects count as missing.
fn non_empty(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => true,
    })
}

fn bind_entry(registry: &CommandRegistry, entry: &Map<String, Value>) -> Option<CommandDescriptor> {
    let id = ["command", "id"]
        .iter()
        .filter_map(|key| entry.get(*key).and_then(Value::as_str))
        .find(|id| !id.is_empty())?;

    let Some(descriptor) = registry.get(id) else {
        tracing::debug!(id, "AI proposed an unregistered command; skipped");
        return None;
    };

    let arguments = entry
        .get("args")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let mut bound = descriptor.with_arguments(&arguments);

    if let Some(effects) = entry.get("side_effects").and_then(Value::as_array) {
        bound
            .side_effects
            .extend(effects.iter().filter_map(Value::as_str).map(str::to_string));
    }
    Some(bound)
}
