use log::info;

use std::path::Path;

use compliance_tally::ComplianceMatrix;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use snafu::ResultExt;

use crate::rcc::{RccResult, WritingExcelSnafu};

const WORKSHEET_NAME: &str = "Compliance";

/// Writes the compliance matrix as a new workbook: a `Location` column followed by one
/// column per quarter.
pub fn write_report(path: &Path, matrix: &ComplianceMatrix) -> RccResult<()> {
    let p = path.display().to_string();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    fill_worksheet(worksheet, matrix).context(WritingExcelSnafu { path: p.clone() })?;
    workbook
        .save(path)
        .context(WritingExcelSnafu { path: p.clone() })?;
    info!("write_report: {} locations written to {}", matrix.rows.len(), p);
    Ok(())
}

fn fill_worksheet(worksheet: &mut Worksheet, matrix: &ComplianceMatrix) -> Result<(), XlsxError> {
    let header = Format::new().set_bold();
    // Values are stored unrounded.
    let percentage = Format::new().set_num_format("0.00");

    worksheet.set_name(WORKSHEET_NAME)?;
    worksheet.write_string_with_format(0, 0, "Location", &header)?;
    for quarter in matrix.quarters() {
        let col = (quarter.index() + 1) as u16;
        worksheet.write_string_with_format(0, col, quarter.label(), &header)?;
    }

    for (idx, row) in matrix.rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        worksheet.write_string(r, 0, row.location.as_str())?;
        for quarter in matrix.quarters() {
            let col = (quarter.index() + 1) as u16;
            worksheet.write_number_with_format(r, col, row.percentage(*quarter), &percentage)?;
        }
    }

    let widest = matrix
        .rows
        .iter()
        .map(|r| r.location.chars().count())
        .max()
        .unwrap_or(0)
        .max("Location".len());
    worksheet.set_column_width(0, (widest + 2) as f64)?;
    worksheet.set_freeze_panes(1, 1)?;
    Ok(())
}
