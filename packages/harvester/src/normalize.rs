//! Text normalization for raw extracted edition text.
//!
//! The only transformation performed here is structural cleanup: running
//! page-marker lines are removed and trailing whitespace is trimmed per
//! line. Case, accents, and internal spacing are left untouched - field
//! level cleanup happens during extraction, not here.

use regex::Regex;
use std::sync::LazyLock;

/// Page-marker signature left behind by PDF extraction ("Page 12" artifacts).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Page \d+").expect("valid regex"));

/// Normalized edition text, available in both consumption modes.
///
/// Span matchers work over [`text`](Self::text) (contiguous, paragraph
/// breaks preserved); line-walking matchers index into
/// [`lines`](Self::lines). Both views come from the same single pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Cleaned text rejoined with line separators.
    pub text: String,

    /// The same content as a line sequence.
    pub lines: Vec<String>,
}

/// Normalize raw extracted text.
///
/// Idempotent: normalizing already-normalized text is a no-op.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedText {
    let lines: Vec<String> = raw
        .lines()
        .filter(|line| !PAGE_MARKER.is_match(line))
        .map(|line| line.trim_end().to_string())
        .collect();

    NormalizedText {
        text: lines.join("\n"),
        lines,
    }
}
