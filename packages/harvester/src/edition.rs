//! Edition fetching: dated PDF download and text extraction.
//!
//! An absent edition is a normal outcome, not an error: the gazette does
//! not publish on weekends and holidays, and the archive answers 404 for
//! those dates. Corrupt or unreadable PDFs get the same treatment so a
//! batch run never stalls on a single bad edition.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config::edition_url;
use crate::error::{HarvesterError, Result};
use crate::http::download_bytes;

/// Fetch and extract the text of the edition published on `date`.
///
/// # Returns
/// * `Ok(Some(text))` - edition found and extracted
/// * `Ok(None)` - no edition for this date (404) or unreadable PDF
/// * `Err(_)` - transport failure (connection, timeout, retries exhausted)
pub fn fetch_edition_text(client: &Client, date: NaiveDate) -> Result<Option<String>> {
    let url = edition_url(date);
    fetch_edition_text_from(client, &url, date)
}

/// Fetch an edition from an explicit URL.
///
/// Split out from [`fetch_edition_text`] so the download behavior can be
/// exercised against a local test server.
pub fn fetch_edition_text_from(
    client: &Client,
    url: &str,
    date: NaiveDate,
) -> Result<Option<String>> {
    let bytes = match download_bytes(client, url) {
        Ok(bytes) => bytes,
        Err(HarvesterError::Http(e)) if e.status() == Some(StatusCode::NOT_FOUND) => {
            tracing::debug!(%date, "no edition published for this date");
            return Ok(None);
        }
        Err(HarvesterError::Http(e)) => {
            return Err(HarvesterError::EditionDownload {
                date: date.to_string(),
                source: e,
            });
        }
        Err(e) => return Err(e),
    };

    match extract_pdf_text(&bytes, date) {
        Ok(text) => Ok(Some(text)),
        Err(e) => {
            tracing::warn!(%date, error = %e, "edition PDF could not be extracted, skipping");
            Ok(None)
        }
    }
}

/// Extract plain text from PDF bytes.
pub fn extract_pdf_text(bytes: &[u8], date: NaiveDate) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| HarvesterError::PdfExtraction {
        date: date.to_string(),
        message: e.to_string(),
    })
}
