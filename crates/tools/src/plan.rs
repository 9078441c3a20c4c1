//! Command Plan
//!
//! Commands staged for user approval, run in order either all at once or one
//! step at a time.

use ghostline_core::CoreResult;

use crate::command::CommandDescriptor;
use crate::registry::CommandRegistry;

#[derive(Debug, Default, Clone)]
pub struct CommandPlan {
    pending: Vec<CommandDescriptor>,
}

impl CommandPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending commands.
    pub fn set_commands(&mut self, commands: Vec<CommandDescriptor>) {
        self.pending = commands;
    }

    pub fn pending(&self) -> &[CommandDescriptor] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run every pending command in order, then clear the plan.
    ///
    /// On failure the failed command and everything after it stay pending.
    pub fn approve_all(&mut self, registry: &mut CommandRegistry) -> CoreResult<usize> {
        let mut executed = 0;
        while !self.pending.is_empty() {
            apply(registry, &self.pending[0])?;
            self.pending.remove(0);
            executed += 1;
        }
        Ok(executed)
    }

    /// Run the first pending command. Returns its id, or `None` when the plan
    /// is empty.
    pub fn step(&mut self, registry: &mut CommandRegistry) -> CoreResult<Option<String>> {
        let Some(first) = self.pending.first() else {
            return Ok(None);
        };
        apply(registry, first)?;
        let done = self.pending.remove(0);
        Ok(Some(done.id))
    }

    pub fn cancel(&mut self) {
        self.pending.clear();
    }

    /// One palette line per pending command.
    pub fn describe(&self) -> Vec<String> {
        self.pending.iter().map(CommandDescriptor::summary_line).collect()
    }
}

/// Registered commands go through the registry so they join the undo history;
/// anything else is invoked directly.
fn apply(registry: &mut CommandRegistry, descriptor: &CommandDescriptor) -> CoreResult<()> {
    if registry.get(&descriptor.id).is_some() {
        registry.execute(descriptor)
    } else {
        descriptor.invoke().map(|_| ())
    }
}
