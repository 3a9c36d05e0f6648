//! Core record types produced by the segmentation engine.
//!
//! All records are immutable value types: produced once per document pass,
//! owned by the caller afterwards. Optional fields use `None` as the absent
//! sentinel - extraction never stores `Some("")`.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Regex matching runs of whitespace (including newlines) for field cleanup.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Clean an extracted field: trim and collapse internal whitespace
/// (newlines included) to single spaces.
#[must_use]
pub fn clean_field(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw.trim(), " ").to_string()
}

/// Clean an optional field, normalizing empty extractions to absent.
///
/// `None` means "not present in the text"; an extraction that produces only
/// whitespace is treated the same way, never kept as an empty string.
#[must_use]
pub fn clean_optional(raw: Option<&str>) -> Option<String> {
    let cleaned = clean_field(raw?);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// A decree: a higher-level legal act, optionally followed by an annex block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decree {
    /// Decree number, e.g. "224/2025".
    pub number: String,

    /// Body text between the start anchor and the closing formula.
    pub body: String,

    /// Content of an "ANNEX TO DECREE No X" continuation block, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annex: Option<String>,
}

/// An appointment order (nomination to a position).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentOrder {
    /// Order number, e.g. "10/2025".
    pub order_number: String,

    /// Action verb phrase as it appeared in the text ("Appoints", "To appoint").
    pub action_verb: String,

    /// Name of the appointed person.
    pub person_name: String,

    /// Position title.
    pub position_title: String,

    /// Position code, when the position carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_code: Option<String>,

    /// Issuing organizational unit (text after the unit prefix).
    pub issuing_body: String,

    /// Person whose exoneration opened the vacancy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacancy_source: Option<String>,

    /// Decree number that transferred the vacancy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_decree: Option<String>,

    /// Circular number granting bonuses, when referenced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_reference: Option<String>,

    /// Full space-joined text of the order block.
    pub description: String,
}

/// A dismissal order (exoneration from a position).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DismissalOrder {
    /// Order number, e.g. "22/2025".
    pub order_number: String,

    /// Action verb phrase as it appeared in the text.
    pub action_verb: String,

    /// Name of the dismissed person.
    pub person_name: String,

    /// Position title.
    pub position_title: String,

    /// Position symbol, when stated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_symbol: Option<String>,

    /// Issuing organizational unit.
    pub issuing_body: String,

    /// Stated reason for the dismissal, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Full space-joined text of the order block.
    pub description: String,
}

/// A notice rendering a previously published order void.
///
/// The referenced order is a weak back-reference (number + publication
/// date); it may or may not appear elsewhere in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnulmentNotice {
    /// Number of the annulling order.
    pub order_number: String,

    /// Number of the order being rendered void.
    pub referenced_order: String,

    /// Publication date of the referenced order (DD/MM/YYYY as printed).
    pub publication_date: String,
}

/// A correction notice replacing text in a previously published order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionNotice {
    /// Number of the order being corrected.
    pub referenced_order: String,

    /// Publication date of the referenced order (DD/MM/YYYY as printed).
    pub publication_date: String,

    /// Text as originally published ("where it reads").
    pub original_text: String,

    /// Corrected text ("it should read").
    pub corrected_text: String,
}

/// Edition context attached to records when processing a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditionContext {
    /// Calendar date of the gazette issue.
    pub issue_date: NaiveDate,
}

/// All records segmented from one edition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordSet {
    pub decrees: Vec<Decree>,
    pub appointments: Vec<AppointmentOrder>,
    pub dismissals: Vec<DismissalOrder>,
    pub annulments: Vec<AnnulmentNotice>,
    pub corrections: Vec<CorrectionNotice>,
}

impl RecordSet {
    /// Total number of records across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.decrees.len()
            + self.appointments.len()
            + self.dismissals.len()
            + self.annulments.len()
            + self.corrections.len()
    }

    /// True when no records of any kind were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
