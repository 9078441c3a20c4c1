//! Workspace Memory Store
//!
//! Category → JSON array map persisted to a single pretty-printed JSON file.
//! Pattern categories hold deduplicated strings; event categories are
//! append-only lists of arbitrary JSON payloads.
//!
//! Every load/mutate/save sequence runs under one lock, so the store can be
//! shared as `Arc<WorkspaceMemory>` between agents, the planner, and prompts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};

use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::ensure_dir;

#[derive(Debug)]
pub struct WorkspaceMemory {
    storage_path: PathBuf,
    data: Mutex<Map<String, Value>>,
}

impl WorkspaceMemory {
    /// Open the store at `path`, loading existing data when the file exists.
    ///
    /// Unreadable or malformed files yield an empty store; the file is only
    /// rewritten on the next mutation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let storage_path = path.into();
        let data = Self::load(&storage_path);
        Self {
            storage_path,
            data: Mutex::new(data),
        }
    }

    fn load(path: &Path) -> Map<String, Value> {
        if !path.exists() {
            return Map::new();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read workspace memory");
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!(path = %path.display(), "workspace memory is not a JSON object; starting empty");
                Map::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid workspace memory JSON; starting empty");
                Map::new()
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn save(&self, data: &Map<String, Value>) -> AppResult<()> {
        if let Some(parent) = self.storage_path.parent() {
            ensure_dir(parent)?;
        }
        let content = serde_json::to_string_pretty(data)?;
        fs::write(&self.storage_path, content).map_err(|e| {
            tracing::warn!(path = %self.storage_path.display(), error = %e, "failed to save workspace memory");
            e
        })?;
        Ok(())
    }

    /// Save, or put `category` back to `previous` when the write fails so
    /// memory never runs ahead of the file.
    fn commit(
        &self,
        data: &mut Map<String, Value>,
        category: &str,
        previous: Option<Value>,
    ) -> AppResult<()> {
        let Err(e) = self.save(data) else {
            return Ok(());
        };
        match previous {
            Some(value) => {
                data.insert(category.to_string(), value);
            }
            None => {
                data.remove(category);
            }
        }
        Err(e)
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Add `value` to `category` unless already present. Saves only on change.
    pub fn remember_pattern(&self, category: &str, value: &str) -> AppResult<()> {
        let mut data = self.lock();
        let previous = data.get(category).cloned();
        let added = with_bucket(&mut data, category, |bucket| {
            if bucket.iter().any(|v| v.as_str() == Some(value)) {
                return false;
            }
            bucket.push(Value::String(value.to_string()));
            true
        })?;
        if added {
            self.commit(&mut data, category, previous)
        } else {
            Ok(())
        }
    }

    /// Remove `value` from `category`. Saves only if it was present.
    pub fn forget_pattern(&self, category: &str, value: &str) -> AppResult<()> {
        let mut data = self.lock();
        let Some(Value::Array(bucket)) = data.get_mut(category) else {
            return Ok(());
        };
        let Some(index) = bucket.iter().position(|v| v.as_str() == Some(value)) else {
            return Ok(());
        };
        let removed = bucket.remove(index);
        if let Err(e) = self.save(&data) {
            if let Some(Value::Array(bucket)) = data.get_mut(category) {
                bucket.insert(index, removed);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Append a structured event to `category`. Always saves.
    pub fn append_event(&self, category: &str, payload: Value) -> AppResult<()> {
        let mut data = self.lock();
        let previous = data.get(category).cloned();
        with_bucket(&mut data, category, |bucket| bucket.push(payload))?;
        self.commit(&mut data, category, previous)
    }

    /// Copy of the whole store.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.lock().clone()
    }

    /// String entries recorded under `category`.
    pub fn patterns(&self, category: &str) -> Vec<String> {
        match self.lock().get(category) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Render the store as a prompt block, or an empty string when empty.
    pub fn as_prompt_context(&self) -> String {
        let data = self.lock();
        if data.is_empty() {
            return String::new();
        }

        let mut lines = vec!["Workspace memory:".to_string()];
        for (key, values) in data.iter() {
            let joined = match values {
                Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(", "),
                other => render(other),
            };
            lines.push(format!("- {}: {}", key, joined));
        }
        lines.join("\n")
    }
}

/// Run `f` on the list stored under `category`, creating it on first use.
/// A non-list value (left by a hand edit) is an error and stays untouched.
fn with_bucket<R>(
    data: &mut Map<String, Value>,
    category: &str,
    f: impl FnOnce(&mut Vec<Value>) -> R,
) -> AppResult<R> {
    let entry = data
        .entry(category.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    let Value::Array(items) = entry else {
        tracing::warn!(category, "memory category is not a list");
        return Err(AppError::validation(format!(
            "memory category '{}' is not a list",
            category
        )));
    };
    Ok(f(items))
}

/// Strings render raw, everything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
