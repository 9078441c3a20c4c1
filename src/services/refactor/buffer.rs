//! Editor Buffers
//!
//! The refactor pipeline talks to editors through [`EditorBuffer`], so any
//! editor surface can be patched. [`TextBuffer`] is the in-memory
//! implementation used by the CLI and tests.

/// Text surface the refactor pipeline reads from and writes to.
pub trait EditorBuffer: Send {
    /// Current selection, if any.
    fn selected_text(&self) -> Option<String>;

    /// Whole buffer contents.
    fn text(&self) -> String;

    /// Replace the contents as a single undoable edit.
    fn apply_edit_block(&mut self, new_text: String);
}

/// In-memory buffer with a selection range and linear undo/redo.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    /// Byte range of the selection
    selection: Option<(usize, usize)>,
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Select the byte range `start..end`. Ranges that are empty, out of
    /// bounds, or not on char boundaries clear the selection.
    pub fn select(&mut self, start: usize, end: usize) {
        self.selection = (start < end && self.text.get(start..end).is_some()).then_some((start, end));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Revert the last edit block. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.text, previous);
        self.redo_stack.push(current);
        self.selection = None;
        true
    }

    /// Re-apply the last undone edit block.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.text, next);
        self.undo_stack.push(current);
        self.selection = None;
        true
    }
}

impl EditorBuffer for TextBuffer {
    fn selected_text(&self) -> Option<String> {
        self.selection
            .and_then(|(start, end)| self.text.get(start..end))
            .map(str::to_string)
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn apply_edit_block(&mut self, new_text: String) {
        let previous = std::mem::replace(&mut self.text, new_text);
        self.undo_stack.push(previous);
        self.redo_stack.clear();
        self.selection = None;
    }
}
