//! Command Descriptor
//!
//! A registered editor command: a callback plus the metadata the palette and
//! the AI adapter need to describe it.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use ghostline_core::CoreResult;
use serde_json::{Map, Value};

/// Undo or redo callback invoked with the descriptor's bound arguments.
pub type CommandCallback = Arc<dyn Fn(&Map<String, Value>) -> CoreResult<()> + Send + Sync>;

/// Main callback; reports whether it changed anything.
pub type ActionCallback =
    Arc<dyn Fn(&Map<String, Value>) -> CoreResult<CommandOutcome> + Send + Sync>;

/// What a command's main callback did.
///
/// Only `Changed` runs enter the undo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Changed,
    Unchanged,
}

impl From<()> for CommandOutcome {
    fn from(_: ()) -> Self {
        CommandOutcome::Changed
    }
}

impl From<bool> for CommandOutcome {
    fn from(changed: bool) -> Self {
        if changed {
            CommandOutcome::Changed
        } else {
            CommandOutcome::Unchanged
        }
    }
}

/// Description of an executable command.
///
/// Cloning is cheap: callbacks are shared behind `Arc`.
#[derive(Clone)]
pub struct CommandDescriptor {
    /// Unique command id, e.g. `editor.format`
    pub id: String,
    /// Human-readable label
    pub description: String,
    /// Palette grouping
    pub category: String,
    pub callback: ActionCallback,
    /// Names of the arguments the callback understands
    pub parameters: Vec<String>,
    /// Declared effects such as `writes files` or `network`
    pub side_effects: BTreeSet<String>,
    pub undo: Option<CommandCallback>,
    pub redo: Option<CommandCallback>,
    /// Arguments passed to the callbacks on execution
    pub arguments: Map<String, Value>,
}

impl CommandDescriptor {
    /// The callback may return `()` (always a change) or a `bool` / `CommandOutcome`
    /// saying whether it changed anything.
    pub fn new<F, R>(id: impl Into<String>, description: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> CoreResult<R> + Send + Sync + 'static,
        R: Into<CommandOutcome>,
    {
        Self {
            id: id.into(),
            description: description.into(),
            category: "general".to_string(),
            callback: Arc::new(move |args: &Map<String, Value>| -> CoreResult<CommandOutcome> {
                callback(args).map(Into::into)
            }),
            parameters: Vec::new(),
            side_effects: BTreeSet::new(),
            undo: None,
            redo: None,
            arguments: Map::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_side_effects<I, S>(mut self, effects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.side_effects.extend(effects.into_iter().map(Into::into));
        self
    }

    pub fn with_undo<F>(mut self, undo: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> CoreResult<()> + Send + Sync + 'static,
    {
        self.undo = Some(Arc::new(undo));
        self
    }

    pub fn with_redo<F>(mut self, redo: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> CoreResult<()> + Send + Sync + 'static,
    {
        self.redo = Some(Arc::new(redo));
        self
    }

    /// Copy of this descriptor with `arguments` overlaid on the bound ones.
    ///
    /// The receiver is left untouched.
    pub fn with_arguments(&self, arguments: &Map<String, Value>) -> Self {
        let mut bound = self.clone();
        for (key, value) in arguments {
            bound.arguments.insert(key.clone(), value.clone());
        }
        bound
    }

    /// Run the main callback with the bound arguments.
    pub fn invoke(&self) -> CoreResult<CommandOutcome> {
        (self.callback)(&self.arguments)
    }

    /// Palette line: `<description> (<effects> | No side-effects)`.
    pub fn summary_line(&self) -> String {
        let details = if self.side_effects.is_empty() {
            "No side-effects".to_string()
        } else {
            self.side_effects
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("{} ({})", self.description, details)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("category", &self.category)
            .field("parameters", &self.parameters)
            .field("side_effects", &self.side_effects)
            .field("has_undo", &self.undo.is_some())
            .field("has_redo", &self.redo.is_some())
            .field("arguments", &self.arguments)
            .finish()
    }
}
