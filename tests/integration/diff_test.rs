//! Unified Diff Integration Tests
//!
//! Diff application scenarios, directly and through the refactor pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream;
use ghostline_llm::{
    AiClient, EchoProvider, LlmProvider, LlmResult, ProviderConfig, TextStream,
};
use ghostline_studio::services::refactor::{
    run_code_action, PipelineError, RefactorRequest,
};
use ghostline_studio::{
    EditorBuffer, PatchApplicationError, RefactorPipeline, TextBuffer, UnifiedDiffApplier,
};
use tokio_util::sync::CancellationToken;

/// Streams a fixed diff back regardless of the prompt.
struct DiffProvider {
    config: ProviderConfig,
    diff: &'static str,
}

impl DiffProvider {
    fn new(diff: &'static str) -> Arc<Self> {
        Arc::new(Self {
            config: ProviderConfig::default(),
            diff,
        })
    }
}

#[async_trait]
impl LlmProvider for DiffProvider {
    fn name(&self) -> &'static str {
        "diff"
    }

    fn model(&self) -> &str {
        "fixed"
    }

    async fn send_message(&self, _prompt: &str) -> LlmResult<String> {
        Ok(self.diff.to_string())
    }

    async fn stream_message(&self, _prompt: &str) -> LlmResult<TextStream> {
        let chunks: Vec<LlmResult<String>> = self
            .diff
            .split_inclusive('\n')
            .map(|line| Ok(line.to_string()))
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

// ============================================================================
// Applier scenarios
// ============================================================================

#[test]
fn test_replace_middle_line() {
    let applier = UnifiedDiffApplier::new();
    assert_eq!(
        applier.apply("a\nb\nc\n", "@@ -2,1 +2,1 @@\n-b\n+B\n").unwrap(),
        "a\nB\nc\n"
    );
}

#[test]
fn test_hunk_past_end_of_file() {
    let err = UnifiedDiffApplier::new()
        .apply("a\nb\nc\n", "@@ -5,1 +5,1 @@\n-e\n+E\n")
        .unwrap_err();
    assert!(matches!(err, PatchApplicationError::PastEndOfFile { .. }));
}

#[test]
fn test_overlapping_hunks_rejected() {
    let patch = "@@ -1,2 +1,2 @@\n-a\n-b\n+x\n+y\n@@ -1,1 +1,1 @@\n-a\n+z\n";
    let err = UnifiedDiffApplier::new().apply("a\nb\nc\n", patch).unwrap_err();
    assert!(err.to_string().contains("overlaps previous hunks"));
}

#[test]
fn test_empty_patch_is_identity() {
    let original = "fn main() {}\n";
    assert_eq!(UnifiedDiffApplier::new().apply(original, "").unwrap(), original);
}

#[test]
fn test_git_style_multi_hunk_patch() {
    let original = "import os\nimport sys\n\n\ndef main():\n    print('hi')\n    return 0\n";
    let patch = "\
diff --git a/app.py b/app.py
--- a/app.py
+++ b/app.py
@@ -1,2 +1,1 @@
-import os
 import sys
@@ -5,3 +4,3 @@
 def main():
-    print('hi')
+    print('hello')
     return 0
";
    let patched = UnifiedDiffApplier::new().apply(original, patch).unwrap();
    assert_eq!(
        patched,
        "import sys\n\n\ndef main():\n    print('hello')\n    return 0\n"
    );
}

#[test]
fn test_zero_length_hunk_inserts_after_named_line() {
    let original = "import os\n\ndef main():\n    pass\n";
    let patch = "@@ -1,0 +2,1 @@\n+import sys\n";
    assert_eq!(
        UnifiedDiffApplier::new().apply(original, patch).unwrap(),
        "import os\nimport sys\n\ndef main():\n    pass\n"
    );
}

#[test]
fn test_hunk_behind_clamped_insertion_overlaps() {
    // The first hunk asks for line 20 of a 3-line file and is clamped to EOF
    let patch = "@@ -20,0 +21,1 @@\n+tail\n@@ -2,1 +2,1 @@\n-b\n+B\n";
    let err = UnifiedDiffApplier::new().apply("a\nb\nc\n", patch).unwrap_err();
    assert!(matches!(err, PatchApplicationError::OverlappingHunk { line: 2, .. }));
}

// ============================================================================
// Refactor pipeline
// ============================================================================

#[tokio::test]
async fn test_pipeline_applies_selection_patch() {
    let client = Arc::new(AiClient::new(DiffProvider::new(
        "@@ -1,2 +1,1 @@\n import sys\n-import os\n",
    )));
    let mut buffer = TextBuffer::new("import sys\nimport os\n");
    buffer.select(0, 10);

    let patched = run_code_action(&mut buffer, client, "optimize_imports", "")
        .await
        .unwrap();
    assert_eq!(patched, "import sys\n");
    assert_eq!(buffer.text(), "import sys\n");

    assert!(buffer.undo());
    assert_eq!(buffer.text(), "import sys\nimport os\n");
}

#[tokio::test]
async fn test_stale_patch_leaves_buffer_untouched() {
    let client = Arc::new(AiClient::new(DiffProvider::new(
        "@@ -1,1 +1,1 @@\n-missing\n+present\n",
    )));
    let mut buffer = TextBuffer::new("actual\n");

    let err = RefactorPipeline::new(client)
        .run(&mut buffer, &RefactorRequest::new("extract_method", "Extract"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Patch(PatchApplicationError::ContextMismatch { line: 1, .. })
    ));
    assert_eq!(buffer.text(), "actual\n");
    assert!(!buffer.can_undo());
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let client = Arc::new(AiClient::new(DiffProvider::new("@@ -1,1 +1,1 @@\n-a\n+b\n")));
    let mut buffer = TextBuffer::new("a\n");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = RefactorPipeline::new(client)
        .run_with_cancel(&mut buffer, &RefactorRequest::new("rename", "Rename"), cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Cancelled));
    assert_eq!(buffer.text(), "a\n");
}

#[tokio::test]
async fn test_echo_backend_is_a_noop_edit() {
    let client = Arc::new(AiClient::new(Arc::new(EchoProvider::new(
        ProviderConfig::default(),
    ))));
    let mut buffer = TextBuffer::new("x = 1\n");

    let patched = RefactorPipeline::new(client)
        .run(&mut buffer, &RefactorRequest::new("generate_tests", "Tests"))
        .await
        .unwrap();
    assert_eq!(patched, "x = 1\n");
}
