//! Unified Diff Applier
//!
//! Applies `@@ -old,len +new,len @@` hunks to in-memory text without an
//! external patch tool.
//!
//! Hunks are positional: each one starts at its `old` line and hunks must be
//! in ascending, non-overlapping order. Deleted and context lines are checked
//! against the original so a stale patch fails instead of corrupting text.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Why a patch could not be applied. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchApplicationError {
    #[error("Invalid hunk header: {0}")]
    InvalidHunkHeader(String),

    #[error("Patch overlaps previous hunks (hunk starts at line {line}, already at line {cursor})")]
    OverlappingHunk { line: usize, cursor: usize },

    #[error("Patch exceeds file length at line {line}")]
    PastEndOfFile { line: usize },

    #[error("Context mismatch at line {line}: expected {expected:?}, found {found:?}")]
    ContextMismatch {
        line: usize,
        expected: String,
        found: String,
    },
}

/// Compiled hunk header pattern (initialized once).
fn hunk_header() -> Option<&'static Regex> {
    static HEADER: OnceLock<Option<Regex>> = OnceLock::new();
    HEADER
        .get_or_init(|| Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,\d+)? @@").ok())
        .as_ref()
}

/// 0-based index of the first original line a hunk touches.
///
/// A zero-length old range (`-N,0`) inserts after line `N`.
fn parse_header(header: &str) -> Result<usize, PatchApplicationError> {
    let invalid = || PatchApplicationError::InvalidHunkHeader(header.to_string());
    let captures = hunk_header().and_then(|re| re.captures(header)).ok_or_else(invalid)?;
    let old_start: usize = captures[1].parse().map_err(|_| invalid())?;
    let old_len: usize = match captures.get(2) {
        Some(len) => len.as_str().parse().map_err(|_| invalid())?,
        None => 1,
    };
    if old_len == 0 {
        return Ok(old_start);
    }
    Ok(old_start.saturating_sub(1))
}

fn ensure_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}

fn strip_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UnifiedDiffApplier;

impl UnifiedDiffApplier {
    pub fn new() -> Self {
        Self
    }

    /// Apply `patch` to `original`, returning the patched text.
    ///
    /// An empty or whitespace-only patch returns `original` unchanged.
    pub fn apply(&self, original: &str, patch: &str) -> Result<String, PatchApplicationError> {
        if patch.trim().is_empty() {
            return Ok(original.to_string());
        }

        let lines: Vec<&str> = original.split_inclusive('\n').collect();
        let patch_lines: Vec<&str> = patch.lines().collect();
        let mut output = String::with_capacity(original.len());
        let mut cursor = 0;
        let mut index = 0;

        while index < patch_lines.len() {
            let raw = patch_lines[index];
            if !raw.starts_with("@@") {
                // File headers and anything between hunks (`diff`, `index`, ...)
                index += 1;
                continue;
            }

            let header = raw;
            index += 1;
            let body_start = index;
            while index < patch_lines.len() && !patch_lines[index].starts_with("@@") {
                index += 1;
            }
            cursor = apply_hunk(
                &lines,
                cursor,
                &mut output,
                header,
                &patch_lines[body_start..index],
            )?;
        }

        for line in lines.iter().skip(cursor) {
            output.push_str(line);
        }
        Ok(output)
    }
}

fn apply_hunk(
    original: &[&str],
    mut cursor: usize,
    output: &mut String,
    header: &str,
    body: &[&str],
) -> Result<usize, PatchApplicationError> {
    let target = parse_header(header)?;
    if target < cursor {
        return Err(PatchApplicationError::OverlappingHunk {
            line: target + 1,
            cursor: cursor + 1,
        });
    }

    // Insertions past the end are clamped to EOF, but the cursor keeps the
    // requested position so later hunks cannot slip in behind it.
    let copy_start = cursor.min(original.len());
    let copy_end = target.min(original.len());
    for line in &original[copy_start..copy_end] {
        output.push_str(line);
    }
    cursor = target;

    for raw in body {
        if let Some(added) = raw.strip_prefix('+') {
            output.push_str(&ensure_newline(added));
            continue;
        }
        if raw.starts_with('\\') {
            // "\ No newline at end of file"
            continue;
        }

        let (expected, keep) = match raw.strip_prefix('-') {
            Some(removed) => (removed, false),
            None => (raw.strip_prefix(' ').unwrap_or(raw), true),
        };

        let Some(current) = original.get(cursor) else {
            return Err(PatchApplicationError::PastEndOfFile { line: cursor + 1 });
        };
        let found = strip_terminator(current);
        if found != expected {
            return Err(PatchApplicationError::ContextMismatch {
                line: cursor + 1,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }

        if keep {
            output.push_str(current);
        }
        cursor += 1;
    }

    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(original: &str, patch: &str) -> Result<String, PatchApplicationError> {
        UnifiedDiffApplier::new().apply(original, patch)
    }

    #[test]
    fn test_empty_patch_is_noop() {
        assert_eq!(apply("a\nb\n", "").unwrap(), "a\nb\n");
        assert_eq!(apply("a\nb\n", "  \n\t").unwrap(), "a\nb\n");
    }

    #[test]
    fn test_single_replacement() {
        let patched = apply("a\nb\nc\n", "@@ -2,1 +2,1 @@\n-b\n+B\n").unwrap();
        assert_eq!(patched, "a\nB\nc\n");
    }

    #[test]
    fn test_file_headers_are_skipped() {
        let patch = "diff --git a/x.py b/x.py\nindex 1..2\n--- a/x.py\n+++ b/x.py\n@@ -1,2 +1,2 @@\n a\n-b\n+c\n";
        assert_eq!(apply("a\nb\n", patch).unwrap(), "a\nc\n");
    }

    #[test]
    fn test_added_line_gets_newline() {
        let patched = apply("a\n", "@@ -1,1 +1,2 @@\n a\n+b").unwrap();
        assert_eq!(patched, "a\nb\n");
    }

    #[test]
    fn test_new_file_hunk() {
        let patched = apply("", "--- /dev/null\n+++ b/new.py\n@@ -0,0 +1,2 @@\n+x = 1\n+y = 2\n").unwrap();
        assert_eq!(patched, "x = 1\ny = 2\n");
    }

    #[test]
    fn test_multiple_hunks_copy_between() {
        let original = "1\n2\n3\n4\n5\n6\n";
        let patch = "@@ -2,1 +2,1 @@\n-2\n+two\n@@ -5,1 +5,1 @@\n-5\n+five\n";
        assert_eq!(apply(original, patch).unwrap(), "1\ntwo\n3\n4\nfive\n6\n");
    }

    #[test]
    fn test_past_end_of_file() {
        let err = apply("a\nb\nc\n", "@@ -5,1 +5,1 @@\n-e\n+E\n").unwrap_err();
        assert_eq!(err, PatchApplicationError::PastEndOfFile { line: 5 });
    }

    #[test]
    fn test_context_past_end_of_file() {
        let err = apply("a\n", "@@ -1,2 +1,2 @@\n a\n b\n").unwrap_err();
        assert!(matches!(err, PatchApplicationError::PastEndOfFile { line: 2 }));
    }

    #[test]
    fn test_overlapping_hunks() {
        let original = "1\n2\n3\n4\n";
        let patch = "@@ -2,2 +2,2 @@\n-2\n-3\n+x\n+y\n@@ -2,1 +2,1 @@\n-2\n+z\n";
        let err = apply(original, patch).unwrap_err();
        assert_eq!(err, PatchApplicationError::OverlappingHunk { line: 2, cursor: 4 });
        assert!(err.to_string().contains("overlaps previous hunks"));
    }

    #[test]
    fn test_invalid_header() {
        let err = apply("a\n", "@@ bogus @@\n-a\n").unwrap_err();
        assert_eq!(err, PatchApplicationError::InvalidHunkHeader("@@ bogus @@".into()));
    }

    #[test]
    fn test_context_mismatch() {
        let err = apply("a\nb\n", "@@ -1,2 +1,2 @@\n x\n-b\n+c\n").unwrap_err();
        assert_eq!(
            err,
            PatchApplicationError::ContextMismatch {
                line: 1,
                expected: "x".into(),
                found: "a".into(),
            }
        );
    }

    #[test]
    fn test_crlf_original_preserved() {
        let patched = apply("a\r\nb\r\n", "@@ -1,2 +1,2 @@\n a\n-b\n+c\n").unwrap();
        assert_eq!(patched, "a\r\nc\n");
    }

    #[test]
    fn test_no_newline_marker_ignored() {
        let patched = apply("a", "@@ -1,1 +1,1 @@\n-a\n\\ No newline at end of file\n+b\n").unwrap();
        assert_eq!(patched, "b\n");
    }

    #[test]
    fn test_blank_context_line() {
        let patched = apply("a\n\nc\n", "@@ -1,3 +1,3 @@\n a\n\n-c\n+C\n").unwrap();
        assert_eq!(patched, "a\n\nC\n");
    }

    #[test]
    fn test_pure_append_then_inverse_restores() {
        let original = "a\nb\n";
        let appended = apply(original, "@@ -2,0 +3,1 @@\n+c\n").unwrap();
        assert_eq!(appended, "a\nb\nc\n");

        let restored = apply(&appended, "@@ -3,1 +2,0 @@\n-c\n").unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_zero_length_hunk_inserts_after_line() {
        assert_eq!(apply("a\nb\nc\n", "@@ -1,0 +2,1 @@\n+x\n").unwrap(), "a\nx\nb\nc\n");
        assert_eq!(apply("a\nb\n", "@@ -0,0 +1,1 @@\n+top\n").unwrap(), "top\na\nb\n");
    }

    #[test]
    fn test_insertion_past_end_is_clamped() {
        assert_eq!(apply("a\n", "@@ -9,0 +10,1 @@\n+z\n").unwrap(), "a\nz\n");
    }

    #[test]
    fn test_overlap_behind_clamped_hunk() {
        let patch = "@@ -10,0 +4,1 @@\n+x\n@@ -5,0 +6,1 @@\n+y\n";
        let err = apply("a\nb\nc\n", patch).unwrap_err();
        assert_eq!(err, PatchApplicationError::OverlappingHunk { line: 6, cursor: 11 });
    }
}
