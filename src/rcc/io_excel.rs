// Primitives for reading the form responses from Excel files.

use log::{debug, info, warn};

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use snafu::prelude::*;

use compliance_tally::Observation;

use crate::rcc::io_common::column_name;
use crate::rcc::*;

/// Column H: the name of the clinic.
pub const LOCATION_COLUMN: u32 = 7;
/// Column I: the date of the observation.
pub const DATE_COLUMN: u32 = 8;

// Latest date of the 1900 date system (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%B %d, %Y"];

pub fn read_observations(path: &str, worksheet_name: Option<&str>) -> RccResult<Vec<Observation>> {
    let wrange = get_range(path, worksheet_name)?;
    read_range(&wrange)
}

/// Reads the observations of a worksheet.
///
/// The columns are taken by position and every row is treated as data: a header
/// row does not hold a date and is dropped like any other row without a valid date.
pub fn read_range(wrange: &Range<DataType>) -> RccResult<Vec<Observation>> {
    let (start_row, start_col) = match wrange.start() {
        Some(p) => p,
        None => {
            info!("read_range: the worksheet is empty");
            return Ok(Vec::new());
        }
    };
    let (_, end_col) = wrange.end().unwrap_or((start_row, start_col));
    debug!(
        "read_range: worksheet from {:?} to column {}",
        (start_row, start_col),
        end_col
    );
    ensure!(
        end_col >= DATE_COLUMN,
        MissingColumnsSnafu {
            last_column: column_name(end_col),
            expected: column_name(DATE_COLUMN),
        }
    );

    let mut res: Vec<Observation> = Vec::new();
    let mut dropped: usize = 0;
    for (idx, row) in wrange.rows().enumerate() {
        // Spreadsheet row number, starting at 1.
        let lineno = start_row as usize + idx + 1;
        let date = match cell_at(row, start_col, DATE_COLUMN).and_then(read_date) {
            Some(d) => d,
            None => {
                debug!(
                    "read_range: row {}: no valid date in {:?}, dropping",
                    lineno,
                    cell_at(row, start_col, DATE_COLUMN)
                );
                dropped += 1;
                continue;
            }
        };
        let location = cell_at(row, start_col, LOCATION_COLUMN)
            .map(read_location)
            .unwrap_or_default();
        debug!("read_range: row {}: {:?} {}", lineno, location, date);
        res.push(Observation { location, date });
    }
    info!(
        "Read {} observations, dropped {} rows without a valid date",
        res.len(),
        dropped
    );
    Ok(res)
}

// Cells left of the range start are empty.
fn cell_at(row: &[DataType], start_col: u32, col: u32) -> Option<&DataType> {
    if col < start_col {
        None
    } else {
        row.get((col - start_col) as usize)
    }
}

pub fn read_location(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Empty => String::new(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        x => format!("{:?}", x),
    }
}

/// The calendar date held by a cell, if any.
pub fn read_date(cell: &DataType) -> Option<NaiveDate> {
    match cell {
        DataType::DateTime(f) | DataType::Float(f) => excel_serial_to_date(*f),
        DataType::Int(i) => excel_serial_to_date(*i as f64),
        DataType::String(s) => parse_date_str(s),
        _ => None,
    }
}

/// Converts a serial date of the 1900 date system. The time of the day is ignored.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let days = serial.floor() as u64;
    // Serial 60 is 29 February 1900, which does not exist.
    let base = match days {
        60 => return None,
        d if d < 60 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        _ => NaiveDate::from_ymd_opt(1899, 12, 30)?,
    };
    base.checked_add_days(Days::new(days))
}

pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> RccResult<Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        let wrange = workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let sheet_names = workbook.sheet_names().to_vec();
        if sheet_names.len() > 1 {
            warn!(
                "{} has {} worksheets, reading the first one ({:?}). Use --excel-worksheet-name to read another one.",
                path,
                sheet_names.len(),
                sheet_names[0]
            );
        }
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn s(x: &str) -> DataType {
        DataType::String(x.to_string())
    }

    #[test]
    fn dates_from_text() {
        assert_eq!(parse_date_str("2024-10-05"), Some(date(2024, 10, 5)));
        assert_eq!(parse_date_str(" 2024/01/15 "), Some(date(2024, 1, 15)));
        assert_eq!(parse_date_str("01/15/2024"), Some(date(2024, 1, 15)));
        assert_eq!(
            parse_date_str("10/31/2024 16:45:00"),
            Some(date(2024, 10, 31))
        );
        assert_eq!(
            parse_date_str("2024-07-01T08:30:00-04:00"),
            Some(date(2024, 7, 1))
        );
        assert_eq!(parse_date_str("Date of observation"), None);
        assert_eq!(parse_date_str(""), None);
        assert_eq!(parse_date_str("2024-02-30"), None);
    }

    #[test]
    fn dates_from_serials() {
        assert_eq!(excel_serial_to_date(45577.0), Some(date(2024, 10, 12)));
        // Time of the day
        assert_eq!(excel_serial_to_date(45306.75), Some(date(2024, 1, 15)));
        assert_eq!(excel_serial_to_date(1.0), Some(date(1900, 1, 1)));
        assert_eq!(excel_serial_to_date(59.0), Some(date(1900, 2, 28)));
        assert_eq!(excel_serial_to_date(60.0), None);
        assert_eq!(excel_serial_to_date(61.0), Some(date(1900, 3, 1)));
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(-3.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(1e12), None);
    }

    #[test]
    fn date_cells() {
        assert_eq!(
            read_date(&DataType::DateTime(45577.0)),
            Some(date(2024, 10, 12))
        );
        assert_eq!(read_date(&DataType::Int(45577)), Some(date(2024, 10, 12)));
        assert_eq!(read_date(&s("2024-10-12")), Some(date(2024, 10, 12)));
        assert_eq!(read_date(&DataType::Empty), None);
        assert_eq!(read_date(&DataType::Bool(true)), None);
    }

    #[test]
    fn location_cells() {
        assert_eq!(read_location(&s("Palm Bay")), "Palm Bay");
        // Kept as written
        assert_eq!(read_location(&s(" Palm Bay")), " Palm Bay");
        assert_eq!(read_location(&DataType::Empty), "");
        assert_eq!(read_location(&DataType::Int(12)), "12");
    }

    #[test]
    fn header_row_is_dropped() {
        let mut r: Range<DataType> = Range::new((0, 0), (3, 8));
        r.set_value((0, 7), s("Clinic"));
        r.set_value((0, 8), s("Date"));
        r.set_value((1, 7), s("Evans"));
        r.set_value((1, 8), s("2024-12-01"));
        r.set_value((2, 7), s("Mobile"));
        r.set_value((2, 8), s("yesterday"));
        r.set_value((3, 8), DataType::DateTime(45306.0));
        let obs = read_range(&r).unwrap();
        assert_eq!(
            obs,
            vec![
                Observation::new("Evans", date(2024, 12, 1)),
                Observation::new("", date(2024, 1, 15)),
            ]
        );
    }

    #[test]
    fn first_row_with_a_date_is_data() {
        let mut r: Range<DataType> = Range::new((0, 0), (1, 8));
        r.set_value((0, 7), s("Sarno"));
        r.set_value((0, 8), s("2024-04-01"));
        r.set_value((1, 7), s("Sarno"));
        r.set_value((1, 8), s("2024-04-02"));
        assert_eq!(read_range(&r).unwrap().len(), 2);
    }

    #[test]
    fn columns_are_absolute() {
        // The used range starts at column C.
        let mut r: Range<DataType> = Range::new((4, 2), (5, 9));
        r.set_value((4, 2), s("ignored"));
        r.set_value((4, 7), s("Endeavor"));
        r.set_value((4, 8), s("2025-03-31"));
        r.set_value((5, 6), s("2025-03-31"));
        r.set_value((5, 7), s("2025-03-31"));
        r.set_value((5, 9), s("2025-03-31"));
        let obs = read_range(&r).unwrap();
        assert_eq!(obs, vec![Observation::new("Endeavor", date(2025, 3, 31))]);
    }

    #[test]
    fn location_column_left_of_range() {
        let mut r: Range<DataType> = Range::new((0, 8), (0, 8));
        r.set_value((0, 8), s("2025-03-31"));
        let obs = read_range(&r).unwrap();
        assert_eq!(obs, vec![Observation::new("", date(2025, 3, 31))]);
    }

    #[test]
    fn narrow_worksheet_is_an_error() {
        let mut r: Range<DataType> = Range::new((0, 0), (1, 7));
        r.set_value((1, 7), s("Barton"));
        let res = read_range(&r);
        match res {
            Err(RccError::MissingColumns {
                last_column,
                expected,
            }) => {
                assert_eq!(last_column, "H");
                assert_eq!(expected, "I");
            }
            x => panic!("unexpected {:?}", x),
        }
    }

    #[test]
    fn empty_worksheet_has_no_observation() {
        let r: Range<DataType> = Range::empty();
        assert_eq!(read_range(&r).unwrap(), vec![]);
    }
}
