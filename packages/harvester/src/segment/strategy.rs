//! Order matching strategies.
//!
//! Two interchangeable implementations of one matcher interface: a
//! heuristic line walk (primary) and a single composed regex per subtype
//! (fallback/validation for regular phrasing). Which one runs is a
//! configuration choice on the engine, not a separate code path per
//! record kind.

use super::MatchDiagnostics;
use crate::normalize::NormalizedText;
use crate::patterns::{
    OrderClass, PatternLibrary, APPOINTMENT_POSITION_PHRASE, BONUS_TRIGGER,
    DISMISSAL_POSITION_PHRASES, POSITION_OF, REASON_TRIGGER, SYMBOL_MARKER, TRANSFER_TRIGGER,
    UNIT_CONNECTORS, UNIT_PREFIXES, VACANCY_TRIGGER,
};
use crate::records::{clean_field, clean_optional, AppointmentOrder, DismissalOrder};

/// Strategy selector for the order passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderStrategy {
    /// Heuristic line walk with literal substring splits (primary).
    #[default]
    LineScan,

    /// Single composed regex per subtype (fallback/validation).
    Regex,
}

/// Orders produced by one strategy pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderOutcome {
    pub appointments: Vec<AppointmentOrder>,
    pub dismissals: Vec<DismissalOrder>,
}

/// Interface shared by both order matching strategies.
pub trait OrderMatcher {
    /// Extract appointment and dismissal orders from the normalized text.
    fn extract_orders(
        &self,
        doc: &NormalizedText,
        library: &PatternLibrary,
        diagnostics: &mut MatchDiagnostics,
    ) -> OrderOutcome;
}

/// Substring after the first occurrence of `marker`.
fn after<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.find(marker).map(|idx| &text[idx + marker.len()..])
}

/// Prefix of `text` up to the first of the given delimiters.
fn until<'a>(text: &'a str, delimiters: &[char]) -> &'a str {
    match text.find(|c| delimiters.contains(&c)) {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Trim a name fragment: whitespace and stray leading/trailing commas.
fn clean_name(raw: &str) -> String {
    clean_field(raw.trim().trim_matches(',').trim())
}

/// Extract an optional clause: text after `trigger`, up to the next comma
/// or period. Empty extractions become absent.
fn optional_clause(description: &str, trigger: &str) -> Option<String> {
    let rest = after(description, trigger)?;
    clean_optional(Some(until(rest, &[',', '.'])))
}

/// Locate the issuing organizational unit: the text after the first
/// matching unit prefix, up to the next delimiter.
fn issuing_body(description: &str) -> Option<String> {
    for prefix in UNIT_PREFIXES {
        if let Some(rest) = after(description, prefix) {
            if let Some(body) = clean_optional(Some(until(rest, &[',', '.']))) {
                return Some(body);
            }
        }
    }
    None
}

/// Whether a comma token is plausibly a position code rather than prose.
fn looks_like_code(token: &str) -> bool {
    !token.is_empty()
        && !token.contains(' ')
        && token.chars().any(|c| c.is_ascii_digit() || c == '-')
}

/// Split the position segment into title and optional code.
///
/// The segment is the text after "the position of". A hyphen inside the
/// first comma token splits title/code in place; otherwise the next comma
/// token is the code when it is code-like and not a unit connector.
fn position_title_and_code(segment: &str) -> (String, Option<String>) {
    let mut tokens = segment.splitn(3, ',');
    let first = tokens.next().unwrap_or("").trim();

    if let Some((title, code)) = first.split_once('-') {
        // Only treat the hyphen as a delimiter when both sides are
        // non-trivial ("ANALYST-CC3"), not for hyphenated titles.
        let title = title.trim();
        let code = code.trim();
        if !title.is_empty() && looks_like_code(code) {
            return (clean_field(title), Some(clean_field(code)));
        }
    }

    let code = tokens
        .next()
        .map(str::trim)
        .filter(|token| {
            !UNIT_CONNECTORS
                .iter()
                .any(|connector| token.starts_with(connector))
        })
        .filter(|token| looks_like_code(token))
        .map(clean_field);

    (clean_field(first), code)
}

/// Heuristic line-walking matcher.
///
/// Maintains a cursor: an anchor line starts a block, subsequent lines are
/// concatenated until the next anchor or a section header, and the cursor
/// advances past the consumed span so no line is scanned twice.
pub struct LineScanMatcher;

impl LineScanMatcher {
    fn appointment_from(
        description: &str,
        number: String,
        verb: String,
        library: &PatternLibrary,
    ) -> Option<AppointmentOrder> {
        let after_verb = after(description, &verb)?;
        if !after_verb.contains(APPOINTMENT_POSITION_PHRASE) {
            return None;
        }
        let name = clean_name(after_verb.split(APPOINTMENT_POSITION_PHRASE).next()?);
        if name.is_empty() {
            return None;
        }

        let position_segment = after(description, POSITION_OF)?;
        let (title, code) = position_title_and_code(position_segment);
        if title.is_empty() {
            return None;
        }

        let body = issuing_body(description)?;

        let bonus = if library.profile().capture_bonus_reference {
            optional_clause(description, BONUS_TRIGGER)
        } else {
            None
        };

        Some(AppointmentOrder {
            order_number: number,
            action_verb: verb,
            person_name: name,
            position_title: title,
            position_code: code,
            issuing_body: body,
            vacancy_source: optional_clause(description, VACANCY_TRIGGER),
            transfer_decree: optional_clause(description, TRANSFER_TRIGGER),
            bonus_reference: bonus,
            description: clean_field(description),
        })
    }

    fn dismissal_from(
        description: &str,
        number: String,
        verb: String,
        library: &PatternLibrary,
    ) -> Option<DismissalOrder> {
        let mut after_verb = after(description, &verb)?;
        // ", at own request," is a tolerated insertion after the verb.
        if let Some(stripped) = after_verb.trim_start().strip_prefix(", at own request,") {
            after_verb = stripped;
        }

        let name_end = DISMISSAL_POSITION_PHRASES
            .iter()
            .filter_map(|phrase| after_verb.find(phrase))
            .min()?;
        let name = clean_name(&after_verb[..name_end]);
        if name.is_empty() {
            return None;
        }

        let position_segment = after(description, POSITION_OF)?;
        let title = clean_field(until(position_segment, &[',', '.']));
        if title.is_empty() {
            return None;
        }

        let body = issuing_body(description)?;

        let reason = if library.profile().capture_dismissal_reason {
            after(description, REASON_TRIGGER)
                .and_then(|rest| clean_optional(Some(until(rest, &['.']))))
        } else {
            None
        };

        Some(DismissalOrder {
            order_number: number,
            action_verb: verb,
            person_name: name,
            position_title: title,
            position_symbol: optional_clause(description, SYMBOL_MARKER),
            issuing_body: body,
            reason,
            description: clean_field(description),
        })
    }
}

impl OrderMatcher for LineScanMatcher {
    fn extract_orders(
        &self,
        doc: &NormalizedText,
        library: &PatternLibrary,
        diagnostics: &mut MatchDiagnostics,
    ) -> OrderOutcome {
        let lines = &doc.lines;
        let mut outcome = OrderOutcome::default();
        let mut i = 0;

        while i < lines.len() {
            if !library.is_order_anchor(&lines[i]) {
                i += 1;
                continue;
            }

            let Some(number) = library.order_number(&lines[i]) else {
                i += 1;
                continue;
            };

            // Classification uses the anchor line only, appointment verbs
            // first, so a block lands in exactly one collection.
            let (class, verb) = library.classify_order(&lines[i]);

            // Concatenate the block: everything until the next anchor or a
            // section header line.
            let mut block = lines[i].trim().to_string();
            let mut j = i + 1;
            while j < lines.len() {
                if library.is_order_anchor(&lines[j]) || library.is_section_terminator(&lines[j]) {
                    break;
                }
                block.push(' ');
                block.push_str(lines[j].trim());
                j += 1;
            }

            match (class, verb) {
                (OrderClass::Appointment, Some(verb)) => {
                    match Self::appointment_from(&block, number, verb, library) {
                        Some(order) => outcome.appointments.push(order),
                        None => diagnostics.dropped_orders += 1,
                    }
                }
                (OrderClass::Dismissal, Some(verb)) => {
                    match Self::dismissal_from(&block, number, verb, library) {
                        Some(order) => outcome.dismissals.push(order),
                        None => diagnostics.dropped_orders += 1,
                    }
                }
                _ => diagnostics.unclassified_orders += 1,
            }

            // Never re-scan consumed lines.
            i = j.max(i + 1);
        }

        outcome
    }
}

/// Composed-regex matcher: one single-pass pattern per subtype.
///
/// Subtype patterns are applied in strict precedence; a later subtype match
/// overlapping an earlier one is skipped so no line produces two records.
pub struct RegexMatcher;

impl RegexMatcher {
    /// Strip the unit prefix from a captured unit phrase
    /// ("Secretariat of Finance" -> "Finance").
    fn strip_unit_prefix(unit: &str) -> String {
        for prefix in UNIT_PREFIXES {
            if let Some(rest) = unit.strip_prefix(prefix) {
                return clean_field(rest);
            }
        }
        clean_field(unit)
    }
}

impl OrderMatcher for RegexMatcher {
    fn extract_orders(
        &self,
        doc: &NormalizedText,
        library: &PatternLibrary,
        diagnostics: &mut MatchDiagnostics,
    ) -> OrderOutcome {
        let text = &doc.text;
        let mut outcome = OrderOutcome::default();
        let mut consumed: Vec<std::ops::Range<usize>> = Vec::new();

        for caps in library.appointment_pattern().captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            consumed.push(whole.range());

            let bonus = if library.profile().capture_bonus_reference {
                clean_optional(caps.get(9).map(|m| m.as_str()))
            } else {
                None
            };

            outcome.appointments.push(AppointmentOrder {
                order_number: caps[1].to_string(),
                action_verb: clean_field(&caps[2]),
                person_name: clean_field(&caps[3]),
                position_title: clean_field(&caps[4]),
                position_code: clean_optional(Some(&caps[5])),
                issuing_body: Self::strip_unit_prefix(&caps[6]),
                vacancy_source: clean_optional(caps.get(7).map(|m| m.as_str())),
                transfer_decree: clean_optional(caps.get(8).map(|m| m.as_str())),
                bonus_reference: bonus,
                description: clean_field(whole.as_str()),
            });
        }

        for caps in library.dismissal_pattern().captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let range = whole.range();
            if consumed
                .iter()
                .any(|claimed| range.start < claimed.end && claimed.start < range.end)
            {
                diagnostics.overlapping_orders += 1;
                continue;
            }

            let reason = if library.profile().capture_dismissal_reason {
                clean_optional(caps.get(7).map(|m| m.as_str()))
            } else {
                None
            };

            outcome.dismissals.push(DismissalOrder {
                order_number: caps[1].to_string(),
                action_verb: clean_field(&caps[2]),
                person_name: clean_field(&caps[3]),
                position_title: clean_field(&caps[4]),
                position_symbol: clean_optional(Some(&caps[5])),
                issuing_body: Self::strip_unit_prefix(&caps[6]),
                reason,
                description: clean_field(whole.as_str()),
            });
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;

    fn library() -> PatternLibrary {
        PatternLibrary::new().unwrap()
    }

    fn line_scan(text: &str) -> (OrderOutcome, MatchDiagnostics) {
        let lib = library();
        let mut diagnostics = MatchDiagnostics::default();
        let outcome = LineScanMatcher.extract_orders(&normalize(text), &lib, &mut diagnostics);
        (outcome, diagnostics)
    }

    fn regex_scan(text: &str) -> (OrderOutcome, MatchDiagnostics) {
        let lib = library();
        let mut diagnostics = MatchDiagnostics::default();
        let outcome = RegexMatcher.extract_orders(&normalize(text), &lib, &mut diagnostics);
        (outcome, diagnostics)
    }

    const APPOINTMENT_LINE: &str = "Ord. No 10/2025 - Appoints JOHN SMITH to hold the position of ANALYST, CODE-5, of the Secretariat of Finance.";

    #[test]
    fn test_line_scan_appointment_fields() {
        let (outcome, diagnostics) = line_scan(APPOINTMENT_LINE);
        assert_eq!(outcome.appointments.len(), 1);
        assert_eq!(diagnostics.total_dropped(), 0);

        let order = &outcome.appointments[0];
        assert_eq!(order.order_number, "10/2025");
        assert_eq!(order.person_name, "JOHN SMITH");
        assert_eq!(order.position_title, "ANALYST");
        assert_eq!(order.position_code.as_deref(), Some("CODE-5"));
        assert_eq!(order.issuing_body, "Finance");
        assert_eq!(order.vacancy_source, None);
        assert_eq!(order.transfer_decree, None);
        assert_eq!(order.bonus_reference, None);
    }

    #[test]
    fn test_line_scan_appointment_wrapped_lines() {
        let text = "Ord. No 11/2025 - Appoints ANA LIMA to hold the\nposition of ADVISOR, DAS-3, of the Office of Planning,\nin a vacancy due to the exoneration of PEDRO ALVES.";
        let (outcome, _) = line_scan(text);
        assert_eq!(outcome.appointments.len(), 1);

        let order = &outcome.appointments[0];
        assert_eq!(order.person_name, "ANA LIMA");
        assert_eq!(order.position_title, "ADVISOR");
        assert_eq!(order.position_code.as_deref(), Some("DAS-3"));
        assert_eq!(order.issuing_body, "Planning");
        assert_eq!(order.vacancy_source.as_deref(), Some("PEDRO ALVES"));
        assert!(!order.description.contains('\n'));
    }

    #[test]
    fn test_line_scan_appointment_hyphenated_code() {
        let text = "Ord. No 12/2025 - Appoints RUI COSTA to hold the position of TECHNICIAN-TN4, of the Foundation of Culture.";
        let (outcome, _) = line_scan(text);
        let order = &outcome.appointments[0];
        assert_eq!(order.position_title, "TECHNICIAN");
        assert_eq!(order.position_code.as_deref(), Some("TN4"));
        assert_eq!(order.issuing_body, "Culture");
    }

    #[test]
    fn test_line_scan_appointment_without_code() {
        let text = "Ord. No 13/2025 - Appoints LIA RAMOS to hold the position of ASSISTANT, of the Secretariat of Health.";
        let (outcome, _) = line_scan(text);
        let order = &outcome.appointments[0];
        assert_eq!(order.position_title, "ASSISTANT");
        assert_eq!(order.position_code, None);
        assert_eq!(order.issuing_body, "Health");
    }

    #[test]
    fn test_line_scan_appointment_transfer_and_bonus() {
        let text = "Ord. No 14/2025 - Appoints IVO REIS to hold the position of MANAGER, CC-2, of the Regional Administration of the North Zone, in a vacancy transferred by Decree No 88/2024, with the bonuses provided for in Circular No 7/2025.";
        let (outcome, _) = line_scan(text);
        let order = &outcome.appointments[0];
        assert_eq!(order.transfer_decree.as_deref(), Some("88/2024"));
        assert_eq!(order.bonus_reference.as_deref(), Some("7/2025"));
        assert_eq!(order.issuing_body, "the North Zone");
    }

    #[test]
    fn test_line_scan_dismissal_fields() {
        let text = "Ord. No 22/2025 - Dismisses MARY JONES, of the position of CLERK, symbol DAS-2, of the Secretariat of Administration, for having been appointed to a committee position.";
        let (outcome, _) = line_scan(text);
        assert_eq!(outcome.dismissals.len(), 1);

        let order = &outcome.dismissals[0];
        assert_eq!(order.order_number, "22/2025");
        assert_eq!(order.person_name, "MARY JONES");
        assert_eq!(order.position_title, "CLERK");
        assert_eq!(order.position_symbol.as_deref(), Some("DAS-2"));
        assert_eq!(order.issuing_body, "Administration");
        assert_eq!(order.reason.as_deref(), Some("to a committee position"));
    }

    #[test]
    fn test_line_scan_dismissal_at_own_request() {
        let text = "Ord. No 23/2025 - Dismisses, at own request, CARLOS NUNES, of the position of DRIVER, symbol DAI-1, of the Foundation of Arts.";
        let (outcome, _) = line_scan(text);
        let order = &outcome.dismissals[0];
        assert_eq!(order.person_name, "CARLOS NUNES");
        assert_eq!(order.reason, None);
    }

    #[test]
    fn test_line_scan_classification_is_exclusive() {
        // Dismissal keyword later in the block must not double-classify.
        let text = "Ord. No 40/2025 - Appoints CARLA PEREZ to hold the position of DIRECTOR, DAS-1, of the Office of Planning,\nin a vacancy due to the exoneration of someone it Dismisses elsewhere.";
        let (outcome, _) = line_scan(text);
        assert_eq!(outcome.appointments.len(), 1);
        assert!(outcome.dismissals.is_empty());
    }

    #[test]
    fn test_line_scan_other_verb_counted_not_emitted() {
        let text = "Ord. No 50/2025 - Grants leave to JOHN SMITH for 30 days.";
        let (outcome, diagnostics) = line_scan(text);
        assert!(outcome.appointments.is_empty());
        assert!(outcome.dismissals.is_empty());
        assert_eq!(diagnostics.unclassified_orders, 1);
    }

    #[test]
    fn test_line_scan_block_ends_at_section_header() {
        let text = "Ord. No 10/2025 - Appoints JOHN SMITH to hold the position of ANALYST, CODE-5, of the Secretariat of Finance.\nMUNICIPAL SECRETARIAT OF FINANCE\ndue to the exoneration of NOT CAPTURED,";
        let (outcome, _) = line_scan(text);
        let order = &outcome.appointments[0];
        // Clause text after the section header belongs to another section.
        assert_eq!(order.vacancy_source, None);
    }

    #[test]
    fn test_line_scan_dropped_candidate_counted() {
        // Appointment verb but no position phrase at all.
        let text = "Ord. No 60/2025 - Appoints JOHN SMITH as head of something informal";
        let (outcome, diagnostics) = line_scan(text);
        assert!(outcome.appointments.is_empty());
        assert_eq!(diagnostics.dropped_orders, 1);
    }

    #[test]
    fn test_regex_strategy_matches_line_scan_on_regular_input() {
        let text = format!(
            "{APPOINTMENT_LINE}\nOrd. No 22/2025 - Dismisses MARY JONES, of the position of CLERK, symbol DAS-2, of the Secretariat of Administration."
        );
        let (from_lines, _) = line_scan(&text);
        let (from_regex, _) = regex_scan(&text);

        assert_eq!(from_lines.appointments.len(), from_regex.appointments.len());
        assert_eq!(from_lines.dismissals.len(), from_regex.dismissals.len());

        let a = &from_lines.appointments[0];
        let b = &from_regex.appointments[0];
        assert_eq!(a.order_number, b.order_number);
        assert_eq!(a.person_name, b.person_name);
        assert_eq!(a.position_title, b.position_title);
        assert_eq!(a.position_code, b.position_code);
        assert_eq!(a.issuing_body, b.issuing_body);
    }

    #[test]
    fn test_regex_strategy_absent_optionals_are_none() {
        let (outcome, _) = regex_scan(APPOINTMENT_LINE);
        let order = &outcome.appointments[0];
        assert_eq!(order.vacancy_source, None);
        assert_eq!(order.transfer_decree, None);
        assert_eq!(order.bonus_reference, None);
    }

    #[test]
    fn test_profile_disables_optional_clauses() {
        use crate::patterns::SegmenterProfile;

        let text = "Ord. No 22/2025 - Dismisses MARY JONES, of the position of CLERK, symbol DAS-2, of the Secretariat of Administration, for having been appointed to a committee position.";
        let lib = PatternLibrary::with_city_and_profile(
            "NITERÓI",
            SegmenterProfile {
                capture_dismissal_reason: false,
                capture_bonus_reference: false,
            },
        )
        .unwrap();

        let mut diagnostics = MatchDiagnostics::default();
        let outcome = LineScanMatcher.extract_orders(&normalize(text), &lib, &mut diagnostics);
        assert_eq!(outcome.dismissals[0].reason, None);
    }

    #[test]
    fn test_position_title_and_code_variants() {
        assert_eq!(
            position_title_and_code("ANALYST, CODE-5, of the Secretariat of Finance."),
            ("ANALYST".to_string(), Some("CODE-5".to_string()))
        );
        assert_eq!(
            position_title_and_code("TECHNICIAN-TN4, of the Foundation of Culture."),
            ("TECHNICIAN".to_string(), Some("TN4".to_string()))
        );
        assert_eq!(
            position_title_and_code("ASSISTANT, of the Secretariat of Health."),
            ("ASSISTANT".to_string(), None)
        );
    }
}
