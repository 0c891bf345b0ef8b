use log::{debug, info};

use compliance_tally::*;
use snafu::{prelude::*, Snafu};

use std::path::PathBuf;

use chrono::Local;

mod io_common;
mod io_excel;
mod io_report;
mod io_summary;
mod opener;

pub use crate::rcc::opener::{FileOpener, NoOpener, SystemOpener};

#[derive(Debug, Snafu)]
pub enum RccError {
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The file {path} does not contain any worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The file {path} does not contain a worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display(
        "The worksheet stops at column {last_column}, the dates are expected in column {expected}"
    ))]
    MissingColumns {
        last_column: String,
        expected: String,
    },
    #[snafu(display("{source}"))]
    Aggregation { source: ComplianceErrors },
    #[snafu(display("Cannot find the home directory to locate the Downloads folder"))]
    MissingHomeDir {},
    #[snafu(display("Cannot derive the name of the report from {path}"))]
    MissingFileName { path: String },
    #[snafu(display("Error writing the report {path}: {source}"))]
    WritingExcel {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display("Error serializing the summary: {source}"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary {path}: {source}"))]
    WritingJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening the report {path}: {source}"))]
    OpeningReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Opening the report {path} failed ({status})"))]
    OpenCommandFailed {
        path: String,
        status: std::process::ExitStatus,
    },
}

pub type RccResult<T> = Result<T, RccError>;

/// Everything needed for one run, as given on the command line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportSettings {
    pub input: String,
    pub excel_worksheet_name: Option<String>,
    /// The Downloads folder of the user when not set.
    pub out_dir: Option<String>,
    /// 'stdout' or a file path.
    pub summary_out: Option<String>,
}

/// Reads the observations, computes the compliance of every clinic and writes the
/// report. Returns the path of the report.
///
/// The report is handed to `opener` once written.
pub fn run_report(settings: &ReportSettings, opener: &dyn FileOpener) -> RccResult<PathBuf> {
    info!("Reading observations from {:?}", settings.input);
    let observations = io_excel::read_observations(
        settings.input.as_str(),
        settings.excel_worksheet_name.as_deref(),
    )?;

    let requirements = RequirementTable::clinics().context(AggregationSnafu {})?;
    let result = run_compliance_stats(&observations, &requirements).context(AggregationSnafu {})?;
    debug!("run_report: matrix: {:?}", result.matrix);

    let now = Local::now().naive_local();
    let out_dir: PathBuf = match settings.out_dir.as_ref() {
        Some(dir) => PathBuf::from(dir),
        None => io_common::downloads_dir()?,
    };
    let report_path = io_common::report_path(&out_dir, settings.input.as_str(), &now)?;

    io_report::write_report(&report_path, &result.matrix)?;
    println!(
        "Results exported successfully to {}",
        report_path.display()
    );

    if let Some(summary_out) = settings.summary_out.as_ref() {
        let js = io_summary::build_summary_js(
            settings.input.as_str(),
            &report_path,
            &now,
            &result,
        );
        io_summary::write_summary(summary_out, &js)?;
    }

    opener.open(&report_path)?;
    Ok(report_path)
}
