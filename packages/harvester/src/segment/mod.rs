//! Segmentation engine: turns normalized edition text into typed records.
//!
//! Matching is first-match, non-overlapping, left-to-right. Record kinds
//! are independent passes over the same text; order subtypes are applied in
//! strict precedence (appointment, then dismissal) so a block is classified
//! exactly once. Unmatched text is expected background content and is
//! discarded without comment; candidates that cannot be completed are
//! dropped and counted, never half-populated.

mod engine;
mod strategy;

pub use engine::SegmentEngine;
pub use strategy::{LineScanMatcher, OrderMatcher, OrderOutcome, OrderStrategy, RegexMatcher};

/// Counts of candidates dropped during a pass.
///
/// These are diagnostics, not errors: the engine logs them and keeps
/// scanning. A malformed candidate never aborts the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchDiagnostics {
    /// Decree anchors whose closing formula never arrived before end of document.
    pub unterminated_decrees: usize,

    /// Order blocks whose anchor line carried no recognized action verb.
    pub unclassified_orders: usize,

    /// Order candidates missing a required sub-field.
    pub dropped_orders: usize,

    /// Annulment candidates missing the referenced order or date.
    pub dropped_annulments: usize,

    /// Correction anchors whose three-line window was incomplete.
    pub incomplete_corrections: usize,

    /// Strategy-B subtype matches skipped because an earlier subtype
    /// already consumed the span.
    pub overlapping_orders: usize,
}

impl MatchDiagnostics {
    /// Total number of dropped candidates across all kinds.
    #[must_use]
    pub fn total_dropped(&self) -> usize {
        self.unterminated_decrees
            + self.unclassified_orders
            + self.dropped_orders
            + self.dropped_annulments
            + self.incomplete_corrections
            + self.overlapping_orders
    }
}
