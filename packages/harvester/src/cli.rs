//! Command-line interface for the harvester.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{collect_batch, dates_in_range};
use crate::config::{validate_date, validate_date_range};
use crate::edition::fetch_edition_text;
use crate::error::{HarvesterError, Result};
use crate::export::{export_batch, export_record_set, ExportFormat};
use crate::http::create_client;
use crate::patterns::PatternLibrary;
use crate::segment::{OrderStrategy, SegmentEngine};

/// Default output directory for exported records.
const DEFAULT_OUTPUT_DIR: &str = "records";

/// Gazette Harvester - Download and segment daily Diário Oficial editions.
#[derive(Parser)]
#[command(name = "gazette-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Export format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Self::Csv,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Order matching strategy argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    LineScan,
    Regex,
}

impl From<StrategyArg> for OrderStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::LineScan => Self::LineScan,
            StrategyArg::Regex => Self::Regex,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and segment a single edition.
    Fetch {
        /// Edition date in YYYY-MM-DD format (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: FormatArg,

        /// Output directory (default: records/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Order matching strategy
        #[arg(long, value_enum, default_value = "line-scan")]
        strategy: StrategyArg,
    },

    /// Fetch and segment every edition in a date range.
    Batch {
        /// First date in YYYY-MM-DD format (inclusive)
        #[arg(long)]
        from: String,

        /// Last date in YYYY-MM-DD format (inclusive)
        #[arg(long)]
        to: String,

        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: FormatArg,

        /// Output directory (default: records/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Order matching strategy
        #[arg(long, value_enum, default_value = "line-scan")]
        strategy: StrategyArg,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            date,
            format,
            output,
            strategy,
        } => fetch_command(
            date.as_deref(),
            format.into(),
            output.as_deref(),
            strategy.into(),
        ),
        Commands::Batch {
            from,
            to,
            format,
            output,
            strategy,
        } => batch_command(&from, &to, format.into(), output.as_deref(), strategy.into()),
    }
}

/// Validate a user-specified output directory before any network I/O.
fn check_output_dir(output: Option<&Path>) -> Result<PathBuf> {
    let Some(output_dir) = output else {
        return Ok(PathBuf::from(DEFAULT_OUTPUT_DIR));
    };

    if !output_dir.exists() {
        return Err(HarvesterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Output directory does not exist: {}", output_dir.display()),
        )));
    }
    if !output_dir.is_dir() {
        return Err(HarvesterError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", output_dir.display()),
        )));
    }
    Ok(output_dir.to_path_buf())
}

fn build_engine(strategy: OrderStrategy) -> Result<SegmentEngine> {
    Ok(SegmentEngine::new(PatternLibrary::new()?, strategy))
}

/// Execute the fetch command for a single edition.
fn fetch_command(
    date: Option<&str>,
    format: ExportFormat,
    output: Option<&Path>,
    strategy: OrderStrategy,
) -> Result<()> {
    // Use today if no date provided
    let date_str = date
        .map(String::from)
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    let edition_date = validate_date(&date_str)?;
    let output_dir = check_output_dir(output)?;

    println!(
        "{} edition of {}",
        style("Fetching").bold(),
        style(&date_str).green()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Downloading edition PDF...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let client = create_client()?;
    let text = match fetch_edition_text(&client, edition_date) {
        Ok(Some(text)) => text,
        Ok(None) => {
            pb.finish_and_clear();
            println!(
                "{} no edition published for {}",
                style("Done:").yellow().bold(),
                date_str
            );
            return Ok(());
        }
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Segmenting records...");
    let engine = build_engine(strategy)?;
    let (set, diagnostics) = engine.segment_with_diagnostics(&text);

    pb.set_message("Exporting...");
    let paths = match export_record_set(&set, format, &output_dir) {
        Ok(paths) => paths,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();

    println!("  Decrees: {}", style(set.decrees.len()).green());
    println!("  Appointments: {}", style(set.appointments.len()).green());
    println!("  Dismissals: {}", style(set.dismissals.len()).green());
    println!("  Annulments: {}", style(set.annulments.len()).green());
    println!("  Corrections: {}", style(set.corrections.len()).green());
    if diagnostics.total_dropped() > 0 {
        println!(
            "  Dropped candidates: {}",
            style(diagnostics.total_dropped()).yellow().bold()
        );
    }

    println!();
    println!(
        "{} {} files in {}",
        style("Saved:").green().bold(),
        paths.len(),
        output_dir.display()
    );

    Ok(())
}

/// Execute the batch command over a date range.
fn batch_command(
    from: &str,
    to: &str,
    format: ExportFormat,
    output: Option<&Path>,
    strategy: OrderStrategy,
) -> Result<()> {
    let from = validate_date(from)?;
    let to = validate_date(to)?;
    validate_date_range(from, to)?;
    let output_dir = check_output_dir(output)?;

    let dates = dates_in_range(from, to);
    println!(
        "{} {} editions from {} to {}",
        style("Processing").bold(),
        dates.len(),
        style(from).green(),
        style(to).green()
    );
    println!();

    let pb = ProgressBar::new(dates.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let client = create_client()?;
    let engine = build_engine(strategy)?;

    let report = collect_batch(
        &dates,
        |date| {
            pb.set_message(date.to_string());
            let result = fetch_edition_text(&client, date);
            pb.inc(1);
            result
        },
        &engine,
    );

    pb.finish_and_clear();

    let paths = export_batch(&report.editions, format, &output_dir)?;

    println!("  Dates processed: {}", style(report.processed()).green());
    println!(
        "  Dates without edition: {}",
        style(report.missing()).yellow()
    );
    println!("  Records: {}", style(report.total_records()).green());
    println!();
    println!(
        "{} {} files in {}",
        style("Saved:").green().bold(),
        paths.len(),
        output_dir.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_fetch() {
        let cli = Cli::parse_from(["gazette-harvester", "fetch"]);

        let Commands::Fetch {
            date,
            format,
            output,
            strategy,
        } = cli.command
        else {
            panic!("expected fetch command");
        };
        assert!(date.is_none());
        assert_eq!(format, FormatArg::Csv);
        assert!(output.is_none());
        assert_eq!(strategy, StrategyArg::LineScan);
    }

    #[test]
    fn test_cli_parse_fetch_with_args() {
        let cli = Cli::parse_from([
            "gazette-harvester",
            "fetch",
            "--date",
            "2025-03-15",
            "--format",
            "json",
            "--strategy",
            "regex",
        ]);

        let Commands::Fetch {
            date,
            format,
            strategy,
            ..
        } = cli.command
        else {
            panic!("expected fetch command");
        };
        assert_eq!(date.as_deref(), Some("2025-03-15"));
        assert_eq!(format, FormatArg::Json);
        assert_eq!(strategy, StrategyArg::Regex);
    }

    #[test]
    fn test_cli_parse_batch() {
        let cli = Cli::parse_from([
            "gazette-harvester",
            "batch",
            "--from",
            "2025-03-14",
            "--to",
            "2025-03-16",
        ]);

        let Commands::Batch { from, to, .. } = cli.command else {
            panic!("expected batch command");
        };
        assert_eq!(from, "2025-03-14");
        assert_eq!(to, "2025-03-16");
    }

    #[test]
    fn test_check_output_dir_default() {
        let dir = check_output_dir(None).unwrap();
        assert_eq!(dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_check_output_dir_missing() {
        let result = check_output_dir(Some(Path::new("/definitely/not/a/real/dir")));
        assert!(result.is_err());
    }
}
