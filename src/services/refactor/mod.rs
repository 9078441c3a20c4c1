//! AI Refactoring
//!
//! - `diff` - `UnifiedDiffApplier` and `PatchApplicationError`
//! - `buffer` - `EditorBuffer` seam and the in-memory `TextBuffer`
//! - `pipeline` - `RefactorPipeline`, which streams an AI patch and applies it

pub mod buffer;
pub mod diff;
pub mod pipeline;

pub use buffer::{EditorBuffer, TextBuffer};
pub use diff::{PatchApplicationError, UnifiedDiffApplier};
pub use pipeline::{
    run_code_action, PipelineError, RefactorAction, RefactorPipeline, RefactorRequest,
    TestSelector,
};
