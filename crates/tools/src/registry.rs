//! Command Registry
//!
//! Ordered command catalog with a linear undo/redo history. Only commands that
//! declare an undo callback and report a change enter the history.

use ghostline_core::{CoreError, CoreResult};

use crate::command::{CommandDescriptor, CommandOutcome};

/// Registry of available commands.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    /// Registration order; a re-registered id moves to the end
    commands: Vec<CommandDescriptor>,
    undo_stack: Vec<CommandDescriptor>,
    redo_stack: Vec<CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. An existing command with the same id is replaced.
    pub fn register_command(&mut self, descriptor: CommandDescriptor) {
        self.commands.retain(|c| c.id != descriptor.id);
        tracing::debug!(id = %descriptor.id, "command registered");
        self.commands.push(descriptor);
    }

    /// Remove a command by id. History entries are kept.
    pub fn unregister(&mut self, id: &str) -> Option<CommandDescriptor> {
        let index = self.commands.iter().position(|c| c.id == id)?;
        Some(self.commands.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.id == id)
    }

    /// Commands in registration order, optionally filtered by a
    /// case-insensitive substring of the id or description.
    pub fn list_commands(&self, filter: Option<&str>) -> Vec<&CommandDescriptor> {
        let needle = match filter.filter(|f| !f.is_empty()) {
            Some(f) => f.to_lowercase(),
            None => return self.commands.iter().collect(),
        };
        self.commands
            .iter()
            .filter(|c| {
                c.id.to_lowercase().contains(&needle)
                    || c.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Run a descriptor's callback with its bound arguments.
    ///
    /// Undoable commands that changed something are pushed on the undo stack,
    /// which invalidates the redo stack.
    pub fn execute(&mut self, descriptor: &CommandDescriptor) -> CoreResult<()> {
        tracing::info!(id = %descriptor.id, "executing command");
        let outcome = descriptor.invoke().map_err(|e| {
            tracing::warn!(id = %descriptor.id, error = %e, "command failed");
            e
        })?;

        if descriptor.undo.is_none() {
            return Ok(());
        }
        if outcome == CommandOutcome::Unchanged {
            tracing::debug!(id = %descriptor.id, "command changed nothing, history untouched");
            return Ok(());
        }
        self.undo_stack.push(descriptor.clone());
        self.redo_stack.clear();
        Ok(())
    }

    /// Execute a registered command by id.
    pub fn execute_by_id(&mut self, id: &str) -> CoreResult<()> {
        let descriptor = self
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(format!("command '{}'", id)))?;
        self.execute(&descriptor)
    }

    /// Undo the most recent undoable command.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. A failing undo
    /// callback leaves the history unchanged.
    pub fn undo_last(&mut self) -> CoreResult<bool> {
        let Some(descriptor) = self.undo_stack.pop() else {
            return Ok(false);
        };

        let result = match &descriptor.undo {
            Some(undo) => undo(&descriptor.arguments),
            None => Ok(()),
        };
        if let Err(e) = result {
            tracing::warn!(id = %descriptor.id, error = %e, "undo failed");
            self.undo_stack.push(descriptor);
            return Err(e);
        }

        tracing::debug!(id = %descriptor.id, "undone");
        self.redo_stack.push(descriptor);
        Ok(true)
    }

    /// Redo the most recently undone command, using its redo callback or,
    /// when it has none, its main callback.
    pub fn redo_last(&mut self) -> CoreResult<bool> {
        let Some(descriptor) = self.redo_stack.pop() else {
            return Ok(false);
        };

        let result = match &descriptor.redo {
            Some(redo) => redo(&descriptor.arguments),
            None => descriptor.invoke().map(|_| ()),
        };
        if let Err(e) = result {
            tracing::warn!(id = %descriptor.id, error = %e, "redo failed");
            self.redo_stack.push(descriptor);
            return Err(e);
        }

        tracing::debug!(id = %descriptor.id, "redone");
        self.undo_stack.push(descriptor);
        Ok(true)
    }
}
