//! Configuration constants and validation functions for the harvester.

use regex::Regex;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};

use crate::error::{HarvesterError, Result};

/// Base URL for the municipal gazette (Diário Oficial) archive.
pub const GAZETTE_BASE_URL: &str = "https://diariooficial.niteroi.rj.gov.br/do";

/// City name used in the decree closing formula.
pub const DEFAULT_CITY: &str = "NITERÓI";

/// HTTP timeout in seconds.
///
/// Set to 30 seconds to accommodate large PDF editions and slow connections.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Sentinel written for an optional field that was not present in the text.
///
/// Distinct from an empty extraction: absent optionals are `None` in the
/// record types and only rendered as this literal at export time.
pub const ABSENT_FIELD: &str = "N/A";

/// Sentinel row value for dates with no published edition (batch mode).
pub const NO_EDITION: &str = "NO EDITION";

/// Month abbreviations used in the gazette archive URL scheme.
///
/// The archive organizes editions as `/do/YYYY/MM_Mon/DD.pdf`, with the
/// month directory named after the local-language abbreviation. Built once
/// at startup and never mutated.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Date pattern: YYYY-MM-DD.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Validate and parse a date string (YYYY-MM-DD).
///
/// Rejects dates in the future since the archive won't have editions for them.
///
/// # Arguments
/// * `date_str` - Date string to validate
///
/// # Returns
/// * `Ok(NaiveDate)` if valid format, valid date, and not in the future
/// * `Err(HarvesterError::InvalidDate)` if invalid
///
/// # Examples
/// ```
/// use gazette_harvester::config::validate_date;
///
/// assert!(validate_date("2025-01-01").is_ok());
/// assert!(validate_date("invalid").is_err());
/// assert!(validate_date("2025-13-01").is_err()); // Invalid month
/// ```
pub fn validate_date(date_str: &str) -> Result<NaiveDate> {
    if !DATE_PATTERN.is_match(date_str) {
        return Err(HarvesterError::InvalidDate(date_str.to_string()));
    }

    let parsed_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| HarvesterError::InvalidDate(date_str.to_string()))?;

    // Reject future dates - the archive won't have editions for them
    let today = chrono::Local::now().date_naive();
    if parsed_date > today {
        return Err(HarvesterError::InvalidDate(format!(
            "{date_str} is in the future (today is {today})"
        )));
    }

    Ok(parsed_date)
}

/// Validate that a date range is ordered.
pub fn validate_date_range(from: NaiveDate, to: NaiveDate) -> Result<()> {
    if from > to {
        return Err(HarvesterError::InvalidDateRange {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    Ok(())
}

/// Build the edition PDF URL for a date.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use gazette_harvester::config::edition_url;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
/// assert_eq!(
///     edition_url(date),
///     "https://diariooficial.niteroi.rj.gov.br/do/2025/03_Mar/15.pdf"
/// );
/// ```
#[must_use]
pub fn edition_url(date: NaiveDate) -> String {
    let month = date.month() as usize;
    let abbreviation = MONTH_ABBREVIATIONS[month - 1];
    format!(
        "{GAZETTE_BASE_URL}/{}/{:02}_{abbreviation}/{:02}.pdf",
        date.year(),
        month,
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date_valid() {
        assert!(validate_date("2025-01-01").is_ok());
        assert!(validate_date("2024-12-31").is_ok());
        assert!(validate_date("2000-06-15").is_ok());
    }

    #[test]
    fn test_validate_date_invalid_format() {
        assert!(validate_date("").is_err());
        assert!(validate_date("2025/01/01").is_err());
        assert!(validate_date("01-01-2025").is_err());
        assert!(validate_date("2025-1-1").is_err());
    }

    #[test]
    fn test_validate_date_invalid_date() {
        assert!(validate_date("2025-13-01").is_err()); // Invalid month
        assert!(validate_date("2025-02-30").is_err()); // Invalid day
        assert!(validate_date("2025-00-01").is_err()); // Zero month
    }

    #[test]
    fn test_validate_date_future_rejected() {
        let tomorrow = chrono::Local::now().date_naive() + chrono::Days::new(1);
        assert!(validate_date(&tomorrow.to_string()).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert!(validate_date_range(from, to).is_ok());
        assert!(validate_date_range(from, from).is_ok());
        assert!(validate_date_range(to, from).is_err());
    }

    #[test]
    fn test_edition_url() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(
            edition_url(date),
            "https://diariooficial.niteroi.rj.gov.br/do/2025/01_Jan/02.pdf"
        );
    }

    #[test]
    fn test_edition_url_december() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            edition_url(date),
            "https://diariooficial.niteroi.rj.gov.br/do/2024/12_Dez/31.pdf"
        );
    }
}
