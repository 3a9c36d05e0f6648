//! Record exporters: CSV and JSON, one file per record kind.
//!
//! The per-kind column lists are the schema contract between the core and
//! the exporter. A record producing a row that disagrees with its declared
//! columns is a fatal configuration error (field-list drift), not a data
//! problem.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{ABSENT_FIELD, NO_EDITION};
use crate::error::{HarvesterError, Result};
use crate::records::{
    AnnulmentNotice, AppointmentOrder, CorrectionNotice, Decree, DismissalOrder, RecordSet,
};

/// Output format for record export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// A record kind with a declared, stable column set.
pub trait Exportable: Serialize {
    /// Kind name, used as the output file stem.
    const KIND: &'static str;

    /// Declared columns, in stable order.
    const COLUMNS: &'static [&'static str];

    /// Produce the CSV row for this record. Absent optionals are rendered
    /// as the [`ABSENT_FIELD`] sentinel.
    fn row(&self) -> Vec<String>;
}

/// Render an optional field for CSV output.
fn field(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| ABSENT_FIELD.to_string())
}

impl Exportable for Decree {
    const KIND: &'static str = "decrees";
    const COLUMNS: &'static [&'static str] = &["number", "body", "annex"];

    fn row(&self) -> Vec<String> {
        vec![self.number.clone(), self.body.clone(), field(&self.annex)]
    }
}

impl Exportable for AppointmentOrder {
    const KIND: &'static str = "appointments";
    const COLUMNS: &'static [&'static str] = &[
        "order_number",
        "action_verb",
        "person_name",
        "position_title",
        "position_code",
        "issuing_body",
        "vacancy_source",
        "transfer_decree",
        "bonus_reference",
        "description",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.order_number.clone(),
            self.action_verb.clone(),
            self.person_name.clone(),
            self.position_title.clone(),
            field(&self.position_code),
            self.issuing_body.clone(),
            field(&self.vacancy_source),
            field(&self.transfer_decree),
            field(&self.bonus_reference),
            self.description.clone(),
        ]
    }
}

impl Exportable for DismissalOrder {
    const KIND: &'static str = "dismissals";
    const COLUMNS: &'static [&'static str] = &[
        "order_number",
        "action_verb",
        "person_name",
        "position_title",
        "position_symbol",
        "issuing_body",
        "reason",
        "description",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.order_number.clone(),
            self.action_verb.clone(),
            self.person_name.clone(),
            self.position_title.clone(),
            field(&self.position_symbol),
            self.issuing_body.clone(),
            field(&self.reason),
            self.description.clone(),
        ]
    }
}

impl Exportable for AnnulmentNotice {
    const KIND: &'static str = "annulments";
    const COLUMNS: &'static [&'static str] =
        &["order_number", "referenced_order", "publication_date"];

    fn row(&self) -> Vec<String> {
        vec![
            self.order_number.clone(),
            self.referenced_order.clone(),
            self.publication_date.clone(),
        ]
    }
}

impl Exportable for CorrectionNotice {
    const KIND: &'static str = "corrections";
    const COLUMNS: &'static [&'static str] = &[
        "referenced_order",
        "publication_date",
        "original_text",
        "corrected_text",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.referenced_order.clone(),
            self.publication_date.clone(),
            self.original_text.clone(),
            self.corrected_text.clone(),
        ]
    }
}

/// Produce a record's row, verifying it against the declared columns.
fn checked_row<R: Exportable>(record: &R) -> Result<Vec<String>> {
    let row = record.row();
    if row.len() != R::COLUMNS.len() {
        return Err(HarvesterError::SchemaMismatch {
            kind: R::KIND,
            expected: R::COLUMNS.len(),
            actual: row.len(),
        });
    }
    Ok(row)
}

/// Write one kind's records for a single edition (no date column).
fn write_kind<R: Exportable>(
    records: &[R],
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf> {
    let path = dir.join(format!("{}.{}", R::KIND, format.extension()));

    match format {
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(R::COLUMNS)?;
            for record in records {
                writer.write_record(checked_row(record)?)?;
            }
            writer.flush()?;
        }
        ExportFormat::Json => {
            let file = File::create(&path)?;
            serde_json::to_writer_pretty(file, records)?;
        }
    }

    tracing::debug!(kind = R::KIND, count = records.len(), path = %path.display(), "wrote records");
    Ok(path)
}

/// Export a single edition's records, one file per kind.
///
/// # Returns
/// Paths of the written files, in kind order.
pub fn export_record_set(
    set: &RecordSet,
    format: ExportFormat,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    Ok(vec![
        write_kind(&set.decrees, format, dir)?,
        write_kind(&set.appointments, format, dir)?,
        write_kind(&set.dismissals, format, dir)?,
        write_kind(&set.annulments, format, dir)?,
        write_kind(&set.corrections, format, dir)?,
    ])
}

/// Build the date-tagged rows for one kind across a batch.
///
/// Every date contributes: a fetch-failed date yields exactly one
/// placeholder row with all columns set to the no-edition sentinel.
fn batch_rows<'a, R: Exportable + 'a>(
    editions: &'a [(NaiveDate, Option<RecordSet>)],
    select: impl Fn(&RecordSet) -> &[R],
) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    for (date, set) in editions {
        match set {
            Some(set) => {
                for record in select(set) {
                    let mut row = vec![date.to_string()];
                    row.extend(checked_row(record)?);
                    rows.push(row);
                }
            }
            None => {
                let mut row = vec![date.to_string()];
                row.extend(R::COLUMNS.iter().map(|_| NO_EDITION.to_string()));
                rows.push(row);
            }
        }
    }

    Ok(rows)
}

/// Write one kind's records for a batch run, with a leading edition date
/// column and placeholder rows for dates without an edition.
fn write_batch_kind<R: Exportable>(
    editions: &[(NaiveDate, Option<RecordSet>)],
    select: impl Fn(&RecordSet) -> &[R],
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf> {
    let path = dir.join(format!("{}.{}", R::KIND, format.extension()));

    match format {
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_path(&path)?;
            let mut header = vec!["edition_date"];
            header.extend_from_slice(R::COLUMNS);
            writer.write_record(&header)?;
            for row in batch_rows(editions, &select)? {
                writer.write_record(&row)?;
            }
            writer.flush()?;
        }
        ExportFormat::Json => {
            let mut values = Vec::new();
            for (date, set) in editions {
                match set {
                    Some(set) => {
                        for record in select(set) {
                            checked_row(record)?;
                            let mut value = serde_json::to_value(record)?;
                            if let serde_json::Value::Object(map) = &mut value {
                                map.insert(
                                    "edition_date".to_string(),
                                    serde_json::Value::String(date.to_string()),
                                );
                            }
                            values.push(value);
                        }
                    }
                    None => {
                        values.push(serde_json::json!({
                            "edition_date": date.to_string(),
                            "status": NO_EDITION,
                        }));
                    }
                }
            }
            let file = File::create(&path)?;
            serde_json::to_writer_pretty(file, &values)?;
        }
    }

    Ok(path)
}

/// Export a batch run's records, one date-tagged file per kind.
pub fn export_batch(
    editions: &[(NaiveDate, Option<RecordSet>)],
    format: ExportFormat,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    Ok(vec![
        write_batch_kind(editions, |set: &RecordSet| set.decrees.as_slice(), format, dir)?,
        write_batch_kind(
            editions,
            |set: &RecordSet| set.appointments.as_slice(),
            format,
            dir,
        )?,
        write_batch_kind(
            editions,
            |set: &RecordSet| set.dismissals.as_slice(),
            format,
            dir,
        )?,
        write_batch_kind(
            editions,
            |set: &RecordSet| set.annulments.as_slice(),
            format,
            dir,
        )?,
        write_batch_kind(
            editions,
            |set: &RecordSet| set.corrections.as_slice(),
            format,
            dir,
        )?,
    ])
}
