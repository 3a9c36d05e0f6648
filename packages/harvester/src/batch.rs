//! Batch driver: process a date range, one independent pass per edition.
//!
//! Each date is fetched and segmented in isolation; a missing or failed
//! edition is a valid terminal state for that date (recorded, never
//! retried indefinitely) and the batch continues.

use chrono::NaiveDate;
use reqwest::blocking::Client;

use crate::config::validate_date_range;
use crate::edition::fetch_edition_text;
use crate::error::Result;
use crate::records::{EditionContext, RecordSet};
use crate::segment::SegmentEngine;

/// Outcome of a batch run over a date range.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One entry per date processed, in order. `None` marks a date without
    /// a usable edition.
    pub editions: Vec<(NaiveDate, Option<RecordSet>)>,
}

impl BatchReport {
    /// Number of dates processed.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.editions.len()
    }

    /// Number of dates without a usable edition.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.editions.iter().filter(|(_, set)| set.is_none()).count()
    }

    /// Total records segmented across all editions.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.editions
            .iter()
            .filter_map(|(_, set)| set.as_ref())
            .map(RecordSet::total)
            .sum()
    }

    /// Edition contexts for the dates that produced records.
    #[must_use]
    pub fn contexts(&self) -> Vec<EditionContext> {
        self.editions
            .iter()
            .filter(|(_, set)| set.is_some())
            .map(|(date, _)| EditionContext { issue_date: *date })
            .collect()
    }
}

/// Inclusive list of dates in a range.
#[must_use]
pub fn dates_in_range(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|date| *date <= to).collect()
}

/// Drive a batch over explicit dates with a caller-supplied fetcher.
///
/// The fetcher contract matches [`fetch_edition_text`]: `Ok(None)` means
/// no edition for that date. A fetch error is logged and treated the same
/// way - absent-for-date - so one bad day never aborts the range.
pub fn collect_batch<F>(dates: &[NaiveDate], mut fetch: F, engine: &SegmentEngine) -> BatchReport
where
    F: FnMut(NaiveDate) -> Result<Option<String>>,
{
    let mut report = BatchReport::default();

    for &date in dates {
        let set = match fetch(date) {
            Ok(Some(text)) => Some(engine.segment(&text)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(%date, error = %e, "edition fetch failed, treating as absent");
                None
            }
        };
        report.editions.push((date, set));
    }

    report
}

/// Fetch and segment every edition in an inclusive date range.
pub fn run_batch(
    client: &Client,
    engine: &SegmentEngine,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<BatchReport> {
    validate_date_range(from, to)?;
    let dates = dates_in_range(from, to);
    Ok(collect_batch(
        &dates,
        |date| fetch_edition_text(client, date),
        engine,
    ))
}
