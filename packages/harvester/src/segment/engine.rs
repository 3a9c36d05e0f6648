//! Segmentation engine orchestrating the per-kind passes.

use super::strategy::{LineScanMatcher, OrderMatcher, OrderStrategy, RegexMatcher};
use super::MatchDiagnostics;
use crate::normalize::{normalize, NormalizedText};
use crate::patterns::PatternLibrary;
use crate::records::{
    clean_field, clean_optional, AnnulmentNotice, CorrectionNotice, Decree, RecordSet,
};

/// Engine applying the pattern library to normalized edition text.
///
/// `segment` is a pure function of its input: no state is carried between
/// documents, so processing a date range is an embarrassingly parallel
/// batch of independent per-document calls.
pub struct SegmentEngine {
    library: PatternLibrary,
    strategy: OrderStrategy,
}

impl SegmentEngine {
    /// Create an engine with an explicit library and order strategy.
    #[must_use]
    pub fn new(library: PatternLibrary, strategy: OrderStrategy) -> Self {
        Self { library, strategy }
    }

    /// Pattern library in use.
    #[must_use]
    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Segment raw edition text into typed record collections.
    ///
    /// Normalization is applied internally and is idempotent, so passing
    /// already-normalized text yields identical results.
    #[must_use]
    pub fn segment(&self, raw: &str) -> RecordSet {
        self.segment_with_diagnostics(raw).0
    }

    /// Segment and also report how many candidates were dropped.
    #[must_use]
    pub fn segment_with_diagnostics(&self, raw: &str) -> (RecordSet, MatchDiagnostics) {
        let doc = normalize(raw);
        let mut diagnostics = MatchDiagnostics::default();

        let decrees = self.scan_decrees(&doc, &mut diagnostics);

        let orders = match self.strategy {
            OrderStrategy::LineScan => {
                LineScanMatcher.extract_orders(&doc, &self.library, &mut diagnostics)
            }
            OrderStrategy::Regex => {
                RegexMatcher.extract_orders(&doc, &self.library, &mut diagnostics)
            }
        };

        let annulments = self.scan_annulments(&doc, &mut diagnostics);
        let corrections = self.scan_corrections(&doc, &mut diagnostics);

        if diagnostics.total_dropped() > 0 {
            tracing::debug!(
                unterminated_decrees = diagnostics.unterminated_decrees,
                unclassified_orders = diagnostics.unclassified_orders,
                dropped_orders = diagnostics.dropped_orders,
                dropped_annulments = diagnostics.dropped_annulments,
                incomplete_corrections = diagnostics.incomplete_corrections,
                overlapping_orders = diagnostics.overlapping_orders,
                "candidates dropped during segmentation"
            );
        }

        (
            RecordSet {
                decrees,
                appointments: orders.appointments,
                dismissals: orders.dismissals,
                annulments,
                corrections,
            },
            diagnostics,
        )
    }

    /// Decree pass: line cursor from start anchor to closing formula, with
    /// an optional annex continuation block.
    fn scan_decrees(&self, doc: &NormalizedText, diagnostics: &mut MatchDiagnostics) -> Vec<Decree> {
        let lines = &doc.lines;
        let mut decrees = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            // An annex anchor line also contains "DECREE No <n>"; it never
            // starts a new decree.
            if self.library.is_annex_anchor(&lines[i]) {
                i += 1;
                continue;
            }
            let Some(number) = self.library.decree_number(&lines[i]) else {
                i += 1;
                continue;
            };

            let mut body_lines: Vec<&str> = Vec::new();
            let mut j = i + 1;
            let mut terminated = false;
            while j < lines.len() {
                if self.library.is_closing_formula(&lines[j]) {
                    terminated = true;
                    break;
                }
                body_lines.push(lines[j].trim());
                j += 1;
            }

            if !terminated {
                // Anchor without a closing formula before end of document:
                // the candidate is dropped, not half-populated.
                diagnostics.unterminated_decrees += 1;
                break;
            }

            // Skip past the closing formula, then pick up an annex block if
            // one immediately follows.
            j += 1;
            let mut annex_lines: Vec<&str> = Vec::new();
            if j < lines.len() && self.library.is_annex_anchor(&lines[j]) {
                j += 1;
                while j < lines.len() {
                    if self.library.decree_number(&lines[j]).is_some()
                        || self.library.is_closing_formula(&lines[j])
                    {
                        break;
                    }
                    annex_lines.push(lines[j].trim());
                    j += 1;
                }
            }

            let body = clean_field(&body_lines.join(" "));
            if !body.is_empty() {
                decrees.push(Decree {
                    number,
                    body,
                    annex: clean_optional(Some(&annex_lines.join(" "))),
                });
            }

            i = j;
        }

        decrees
    }

    /// Annulment pass: independent scan over all lines.
    fn scan_annulments(
        &self,
        doc: &NormalizedText,
        diagnostics: &mut MatchDiagnostics,
    ) -> Vec<AnnulmentNotice> {
        let mut annulments = Vec::new();

        for line in &doc.lines {
            if !self.library.has_annulment_phrase(line) {
                continue;
            }

            let order_number = self.library.order_number(line);
            let referenced = self.library.referenced_order_in(line);
            let date = self.library.published_date_in(line);

            match (order_number, referenced, date) {
                (Some(order_number), Some(referenced_order), Some(publication_date)) => {
                    annulments.push(AnnulmentNotice {
                        order_number,
                        referenced_order,
                        publication_date,
                    });
                }
                _ => diagnostics.dropped_annulments += 1,
            }
        }

        annulments
    }

    /// Correction pass: fixed three-line window, all-or-nothing.
    fn scan_corrections(
        &self,
        doc: &NormalizedText,
        diagnostics: &mut MatchDiagnostics,
    ) -> Vec<CorrectionNotice> {
        use crate::patterns::{CORRECTION_ANCHOR, SHOULD_READ, WHERE_IT_READS};

        let lines = &doc.lines;
        let mut corrections = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            if !lines[i].contains(CORRECTION_ANCHOR) {
                i += 1;
                continue;
            }

            // The window is non-negotiable: anchor line, then the original
            // text line, then the corrected text line. Trailing incomplete
            // windows at end of document are tolerated, not errors.
            let original_line = lines.get(i + 1);
            let corrected_line = lines.get(i + 2);

            let referenced = lines[i]
                .split(CORRECTION_ANCHOR)
                .nth(1)
                .map(|rest| rest.split(',').next().unwrap_or(rest).trim().to_string())
                .filter(|number| !number.is_empty());

            // The publication date usually sits on the anchor line but may
            // wrap onto the next one.
            let date = self
                .library
                .published_date_in(&lines[i])
                .or_else(|| original_line.and_then(|line| self.library.published_date_in(line)));

            let original = original_line
                .and_then(|line| line.split(WHERE_IT_READS).nth(1))
                .map(|text| clean_field(text.trim_end_matches(['.', ','])));
            let corrected = corrected_line
                .and_then(|line| line.split(SHOULD_READ).nth(1))
                .map(|text| clean_field(text.trim_end_matches(['.', ','])));

            match (referenced, date, original, corrected) {
                (
                    Some(referenced_order),
                    Some(publication_date),
                    Some(original_text),
                    Some(corrected_text),
                ) if !original_text.is_empty() && !corrected_text.is_empty() => {
                    corrections.push(CorrectionNotice {
                        referenced_order,
                        publication_date,
                        original_text,
                        corrected_text,
                    });
                    i += 3;
                }
                _ => {
                    diagnostics.incomplete_corrections += 1;
                    i += 1;
                }
            }
        }

        corrections
    }
}

impl Default for SegmentEngine {
    /// Engine with the default library and the line-scan strategy.
    #[allow(clippy::expect_used)] // Built-in patterns are guaranteed to be valid
    fn default() -> Self {
        let library = PatternLibrary::new().expect("valid built-in patterns");
        Self::new(library, OrderStrategy::default())
    }
}
