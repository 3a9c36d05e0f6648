//! Gazette Harvester - Download and segment municipal gazette editions.
//!
//! This crate downloads daily Diário Oficial editions (PDF), extracts their
//! text, and segments the noisy multi-column prose into typed legal-act
//! records: decrees, appointment orders, dismissal orders, annulment
//! notices, and correction notices, exported as CSV or JSON.
//!
//! # Example
//!
//! ```
//! use gazette_harvester::segment::SegmentEngine;
//!
//! let engine = SegmentEngine::default();
//! let text = "DECREE No 224/2025\nArt. 1 — Opens credit.\nMUNICIPAL PREFECTURE OF NITERÓI, ON 15 OF MARCH OF 2025.";
//! let records = engine.segment(text);
//! assert_eq!(records.decrees.len(), 1);
//! assert_eq!(records.decrees[0].number, "224/2025");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and validation
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client for downloading editions
//! - [`edition`]: Edition PDF fetch and text extraction
//! - [`normalize`]: Text normalizer (page-marker stripping)
//! - [`records`]: Core record types
//! - [`patterns`]: Pattern library, one matcher set per record kind
//! - [`segment`]: Segmentation engine and order strategies
//! - [`export`]: CSV/JSON record exporters
//! - [`batch`]: Date-range batch driver
//! - [`cli`]: Command-line interface

pub mod batch;
pub mod cli;
pub mod config;
pub mod edition;
pub mod error;
pub mod export;
pub mod http;
pub mod normalize;
pub mod patterns;
pub mod records;
pub mod segment;

// Re-export commonly used items
pub use config::{validate_date, validate_date_range};
pub use error::{HarvesterError, Result};
pub use patterns::{PatternLibrary, SegmenterProfile};
pub use records::{
    AnnulmentNotice, AppointmentOrder, CorrectionNotice, Decree, DismissalOrder, EditionContext,
    RecordSet,
};
pub use segment::{OrderStrategy, SegmentEngine};
