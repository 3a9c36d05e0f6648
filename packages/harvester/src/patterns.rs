//! Pattern library: the structural matchers for every record kind.
//!
//! Each record kind is defined by a start anchor, an end anchor or
//! terminator, and a set of field boundaries. Minor phrasing variants
//! (verb forms, connector words, punctuation before clauses) are treated
//! as equivalent by listing the known literals at each anchor point
//! rather than relying on a single rigid form.
//!
//! The library is built once at startup and never mutated afterwards.

use regex::Regex;

use crate::config::DEFAULT_CITY;
use crate::error::Result;

/// Start anchor for a decree.
pub const DECREE_ANCHOR: &str = "DECREE No";

/// Anchor for a decree annex continuation block.
pub const ANNEX_ANCHOR: &str = "ANNEX TO DECREE No";

/// Start anchor for an order line.
pub const ORDER_ANCHOR: &str = "Ord. No";

/// Appointment action verb variants.
pub const APPOINTMENT_VERBS: [&str; 2] = ["Appoints", "To appoint"];

/// Dismissal action verb variants. The ", at own request," insertion is a
/// tolerated suffix, not a distinct subtype.
pub const DISMISSAL_VERBS: [&str; 2] = ["Dismisses", "To dismiss"];

/// Phrase between the appointee name and the position title.
pub const APPOINTMENT_POSITION_PHRASE: &str = "to hold the position of";

/// Phrase ending the dismissed person's name (with leading connector).
pub const DISMISSAL_POSITION_PHRASES: [&str; 2] = [" of the position", " from the position"];

/// Phrase preceding a position title in either order subtype.
pub const POSITION_OF: &str = "the position of";

/// Marker preceding a dismissal position symbol.
pub const SYMBOL_MARKER: &str = "symbol";

/// Organizational-unit prefixes, tested in order; the issuing body is the
/// text after the first matching prefix up to the next delimiter.
pub const UNIT_PREFIXES: [&str; 4] = [
    "Secretariat of",
    "Office of",
    "Foundation of",
    "Regional Administration of",
];

/// Connector variants before an organizational unit.
pub const UNIT_CONNECTORS: [&str; 2] = ["of the", "from the"];

/// Trigger phrase for the optional vacancy-source clause.
pub const VACANCY_TRIGGER: &str = "due to the exoneration of";

/// Trigger phrase for the optional transferred-vacancy clause.
pub const TRANSFER_TRIGGER: &str = "transferred by Decree No";

/// Trigger phrase for the optional bonus-reference clause.
pub const BONUS_TRIGGER: &str = "with the bonuses provided for in Circular No";

/// Trigger phrase for the optional dismissal reason clause.
pub const REASON_TRIGGER: &str = "for having been appointed";

/// Phrases marking an annulment notice (matched case-insensitively).
pub const ANNULMENT_PHRASES: [&str; 2] = ["renders void", "without effect"];

/// Anchor before the referenced order number in an annulment.
pub const REFERENCED_ORDER_ANCHOR: &str = "Order No";

/// Anchor before a referenced publication date.
pub const PUBLISHED_ON: &str = "published on";

/// Start anchor for a correction notice.
pub const CORRECTION_ANCHOR: &str = "In Order No";

/// Marker for the original text line of a correction.
pub const WHERE_IT_READS: &str = "where it reads:";

/// Marker for the corrected text line of a correction.
pub const SHOULD_READ: &str = "it should read:";

/// Section header line that terminates an order block.
pub const SECTION_TERMINATOR: &str = "MUNICIPAL SECRETARIAT";

/// Classification of an order anchor line by its action verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderClass {
    Appointment,
    Dismissal,
    Other,
}

/// Configuration profile for field boundaries that historical source
/// variants disagreed on. The default is the most complete superset;
/// narrower variants are profiles, not separate engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterProfile {
    /// Capture the dismissal "reason" clause when present.
    pub capture_dismissal_reason: bool,

    /// Capture the appointment bonus-reference clause when present.
    pub capture_bonus_reference: bool,
}

impl Default for SegmenterProfile {
    fn default() -> Self {
        Self {
            capture_dismissal_reason: true,
            capture_bonus_reference: true,
        }
    }
}

/// Compiled matchers for every record kind.
pub struct PatternLibrary {
    city: String,
    closing_probe: String,
    profile: SegmenterProfile,
    decree_start: Regex,
    decree_span: Regex,
    order_number: Regex,
    referenced_order: Regex,
    published_date: Regex,
    appointment: Regex,
    dismissal: Regex,
    annulment: Regex,
    correction: Regex,
}

impl PatternLibrary {
    /// Build the library for the default city and profile.
    pub fn new() -> Result<Self> {
        Self::with_city_and_profile(DEFAULT_CITY, SegmenterProfile::default())
    }

    /// Build the library for a specific city and profile.
    pub fn with_city_and_profile(city: &str, profile: SegmenterProfile) -> Result<Self> {
        let escaped_city = regex::escape(city);

        let decree_start = Regex::new(r"DECREE No (\d+/\d{4})")?;

        // Contiguous-text form of the decree pattern: start anchor, lazy
        // body span, closing formula (case-insensitive tolerant).
        let decree_span = Regex::new(&format!(
            r"(?s)DECREE No (\d+/\d{{4}})\s*(.*?)\s*(?i)MUNICIPAL PREFECTURE OF {escaped_city},\s*ON \d{{1,2}} OF \p{{L}}+ OF \d{{4}}\."
        ))?;

        let order_number = Regex::new(r"Ord\. No\s+(\d+/\d+)")?;

        // Back-references inside annulment and correction lines. The gazette
        // is not consistent about capitalization here, so both match
        // case-insensitively.
        let referenced_order = Regex::new(r"(?i)Order No\s+(\d+/\d+)")?;
        let published_date = Regex::new(r"(?i)published on\s+(\d{2}/\d{2}/\d{4})")?;

        let appointment = Regex::new(
            r"(?s)Ord\. No (\d+/\d+)\s*-\s*(Appoints|To appoint),?\s+([\p{L} .]+?)\s+to hold the position of\s+([\p{L} ]+?),\s*([0-9A-Z][\w-]*),\s*(?:of|from) the ((?:Secretariat|Office|Foundation|Regional Administration) of [\p{L} ]+?)[.,](?:\s*in a vacancy due to the exoneration of\s+([\p{L} .]+?)[.,])?(?:\s*in a vacancy transferred by Decree No\s+(\d+/\d+)[.,])?(?:\s*with the bonuses provided for in Circular No\s+(\d+/\d+)\.)?",
        )?;

        let dismissal = Regex::new(
            r"(?s)Ord\. No (\d+/\d+)\s*-\s*(Dismisses,\s*at own request,|To dismiss,\s*at own request,|Dismisses|To dismiss)\s+([\p{L} .]+?),?\s+(?:of|from) the position of\s+([\p{L} ]+?),\s*symbol\s+([\w-]+),\s*(?:of|from) the ((?:Secretariat|Office|Foundation|Regional Administration) of [\p{L} ]+?)[.,](?:\s*for having been appointed\s+([^.]+?)\.)?",
        )?;

        let annulment = Regex::new(
            r"Ord\. No (\d+/\d+)\s*-\s*(?i:renders\s+(?:void|without\s+effect))\s+(?:the\s+)?(?:Order|Ord\.) No (\d+/\d+),\s*published on (\d{2}/\d{2}/\d{4})\.?",
        )?;

        let correction = Regex::new(
            r"(?s)In Order No (\d+/\d+),\s*published on (\d{2}/\d{2}/\d{4}),\s*where it reads:\s*(.+?)[,.]?\s*it should read:\s*(.+?)\.",
        )?;

        Ok(Self {
            closing_probe: format!("MUNICIPAL PREFECTURE OF {}", city.to_uppercase()),
            city: city.to_string(),
            profile,
            decree_start,
            decree_span,
            order_number,
            referenced_order,
            published_date,
            appointment,
            dismissal,
            annulment,
            correction,
        })
    }

    /// City name the closing formula is matched against.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Active configuration profile.
    #[must_use]
    pub fn profile(&self) -> SegmenterProfile {
        self.profile
    }

    /// Extract the decree number if this line is a decree start anchor.
    #[must_use]
    pub fn decree_number(&self, line: &str) -> Option<String> {
        self.decree_start
            .captures(line)
            .map(|caps| caps[1].to_string())
    }

    /// Test whether a line contains the decree closing formula.
    #[must_use]
    pub fn is_closing_formula(&self, line: &str) -> bool {
        line.to_uppercase().contains(&self.closing_probe)
    }

    /// Test whether a line starts a decree annex block.
    #[must_use]
    pub fn is_annex_anchor(&self, line: &str) -> bool {
        line.contains(ANNEX_ANCHOR)
    }

    /// Test whether a line is an order start anchor.
    #[must_use]
    pub fn is_order_anchor(&self, line: &str) -> bool {
        line.contains(ORDER_ANCHOR)
    }

    /// Extract the order number from an anchor line, stripping the trailing
    /// dash separator when the number runs into it.
    #[must_use]
    pub fn order_number(&self, line: &str) -> Option<String> {
        if let Some(caps) = self.order_number.captures(line) {
            return Some(caps[1].to_string());
        }
        // Fall back to a raw token split for numbers glued to the dash
        // separator ("Ord. No 10/2025-").
        let after = line.split(ORDER_ANCHOR).nth(1)?;
        let token = after.split_whitespace().next()?;
        let token = token.trim_end_matches('-');
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Classify an order anchor line by its action verb.
    ///
    /// Appointment verbs are tested before dismissal verbs; the first match
    /// wins, so a block is classified exactly once.
    #[must_use]
    pub fn classify_order(&self, line: &str) -> (OrderClass, Option<String>) {
        for verb in APPOINTMENT_VERBS {
            if line.contains(verb) {
                return (OrderClass::Appointment, Some(verb.to_string()));
            }
        }
        for verb in DISMISSAL_VERBS {
            if line.contains(verb) {
                return (OrderClass::Dismissal, Some(verb.to_string()));
            }
        }
        (OrderClass::Other, None)
    }

    /// Test whether a line is an organizational-unit section header that
    /// terminates an order block.
    #[must_use]
    pub fn is_section_terminator(&self, line: &str) -> bool {
        line.contains(SECTION_TERMINATOR)
    }

    /// Test whether a line contains an annulment phrase.
    #[must_use]
    pub fn has_annulment_phrase(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        ANNULMENT_PHRASES.iter().any(|p| lower.contains(p))
    }

    /// Extract a referenced order number ("Order No 5/2025") from a line.
    #[must_use]
    pub fn referenced_order_in(&self, line: &str) -> Option<String> {
        self.referenced_order
            .captures(line)
            .map(|caps| caps[1].to_string())
    }

    /// Extract a referenced publication date ("published on 10/01/2025").
    #[must_use]
    pub fn published_date_in(&self, line: &str) -> Option<String> {
        self.published_date
            .captures(line)
            .map(|caps| caps[1].to_string())
    }

    /// Contiguous-text decree pattern (number, body groups).
    #[must_use]
    pub fn decree_span(&self) -> &Regex {
        &self.decree_span
    }

    /// Composed appointment pattern (strategy B).
    #[must_use]
    pub fn appointment_pattern(&self) -> &Regex {
        &self.appointment
    }

    /// Composed dismissal pattern (strategy B).
    #[must_use]
    pub fn dismissal_pattern(&self) -> &Regex {
        &self.dismissal
    }

    /// Composed annulment pattern (strategy B).
    #[must_use]
    pub fn annulment_pattern(&self) -> &Regex {
        &self.annulment
    }

    /// Composed correction pattern (strategy B).
    #[must_use]
    pub fn correction_pattern(&self) -> &Regex {
        &self.correction
    }
}
