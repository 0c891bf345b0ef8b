// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use chrono::{Datelike, NaiveDate};

/// A quarter of a fiscal year that starts in October.
///
/// The quarters are ordered: Q1 (October to December) comes first.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum FiscalQuarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl FiscalQuarter {
    /// All the quarters, in the order they appear in a report.
    pub const ALL: [FiscalQuarter; 4] = [
        FiscalQuarter::Q1,
        FiscalQuarter::Q2,
        FiscalQuarter::Q3,
        FiscalQuarter::Q4,
    ];

    /// The quarter of a calendar month (1 = January).
    ///
    /// Returns `None` for anything outside 1..=12.
    pub fn from_month(month: u32) -> Option<FiscalQuarter> {
        match month {
            10..=12 => Some(FiscalQuarter::Q1),
            1..=3 => Some(FiscalQuarter::Q2),
            4..=6 => Some(FiscalQuarter::Q3),
            7..=9 => Some(FiscalQuarter::Q4),
            _ => None,
        }
    }

    /// The quarter a date falls into.
    pub fn of(date: &NaiveDate) -> FiscalQuarter {
        match date.month() {
            10..=12 => FiscalQuarter::Q1,
            1..=3 => FiscalQuarter::Q2,
            4..=6 => FiscalQuarter::Q3,
            // chrono months are always within 1..=12
            _ => FiscalQuarter::Q4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FiscalQuarter::Q1 => "Q1",
            FiscalQuarter::Q2 => "Q2",
            FiscalQuarter::Q3 => "Q3",
            FiscalQuarter::Q4 => "Q4",
        }
    }

    /// Position of the quarter in `ALL`.
    pub fn index(&self) -> usize {
        match self {
            FiscalQuarter::Q1 => 0,
            FiscalQuarter::Q2 => 1,
            FiscalQuarter::Q3 => 2,
            FiscalQuarter::Q4 => 3,
        }
    }
}

impl Display for FiscalQuarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One observation, as read from a spreadsheet row.
///
/// The location is kept exactly as it was written, it is not checked against
/// the requirement table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Observation {
    pub location: String,
    pub date: NaiveDate,
}

impl Observation {
    pub fn new(location: &str, date: NaiveDate) -> Observation {
        Observation {
            location: location.to_string(),
            date,
        }
    }
}

// ********* Requirements **********

/// The quarterly number of observations expected from each clinic.
///
/// The numbers are set by Risk and Compliance from the staff population of each
/// clinic.
pub const CLINIC_REQUIREMENTS: &[(&str, i64)] = &[
    ("Barton", 10),
    ("Circles of Care", 2),
    ("Endeavor", 5),
    ("Evans", 2),
    ("Heritage Park", 2),
    ("Malabar", 5),
    ("Mobile", 2),
    ("Palm Bay", 10),
    ("Port St John", 5),
    ("Sarno", 10),
    ("Valentine", 5),
    ("Titusville Dental", 2),
    ("Titusville", 5),
    ("University Dental", 2),
];

/// A validated mapping from a location to its quarterly requirement.
///
/// Locations are unique. The declaration order is kept.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RequirementTable {
    entries: Vec<(String, i64)>,
}

impl RequirementTable {
    pub fn new(entries: &[(&str, i64)]) -> Result<RequirementTable, ComplianceErrors> {
        if entries.is_empty() {
            return Err(ComplianceErrors::EmptyRequirements);
        }
        let mut res: Vec<(String, i64)> = Vec::with_capacity(entries.len());
        for (name, requirement) in entries.iter() {
            if res.iter().any(|(n, _)| n == name) {
                return Err(ComplianceErrors::DuplicateLocation(name.to_string()));
            }
            res.push((name.to_string(), *requirement));
        }
        Ok(RequirementTable { entries: res })
    }

    /// The table of the clinics (see `CLINIC_REQUIREMENTS`).
    pub fn clinics() -> Result<RequirementTable, ComplianceErrors> {
        RequirementTable::new(CLINIC_REQUIREMENTS)
    }

    pub fn requirement(&self, location: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(name, _)| name == location)
            .map(|(_, r)| *r)
    }

    pub fn contains(&self, location: &str) -> bool {
        self.requirement(location).is_some()
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn entries(&self) -> &[(String, i64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ******** Output data structures *********

/// Number of observations for one location in one quarter.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TallyCell {
    pub location: String,
    pub quarter: FiscalQuarter,
    pub count: u64,
}

/// One row of the compliance matrix.
#[derive(PartialEq, Debug, Clone)]
pub struct ComplianceRow {
    pub location: String,
    pub requirement: i64,
    /// Tally per quarter, indexed like `FiscalQuarter::ALL`.
    pub tally: [u64; 4],
    /// Percentage met per quarter, within [0, 100].
    pub percentages: [f64; 4],
}

impl ComplianceRow {
    pub fn percentage(&self, quarter: FiscalQuarter) -> f64 {
        self.percentages[quarter.index()]
    }

    pub fn count(&self, quarter: FiscalQuarter) -> u64 {
        self.tally[quarter.index()]
    }
}

/// Percentage met for every location (rows) and quarter (columns).
///
/// Rows are sorted by location name.
#[derive(PartialEq, Debug, Clone)]
pub struct ComplianceMatrix {
    pub rows: Vec<ComplianceRow>,
}

impl ComplianceMatrix {
    pub fn row(&self, location: &str) -> Option<&ComplianceRow> {
        self.rows.iter().find(|r| r.location == location)
    }

    pub fn get(&self, location: &str, quarter: FiscalQuarter) -> Option<f64> {
        self.row(location).map(|r| r.percentage(quarter))
    }

    pub fn quarters(&self) -> &'static [FiscalQuarter] {
        &FiscalQuarter::ALL
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ComplianceResult {
    /// Every location of the requirement table times every quarter.
    pub tally: Vec<TallyCell>,
    pub matrix: ComplianceMatrix,
    /// Locations seen in the observations that have no requirement, with their
    /// number of observations.
    pub unrecognized_locations: Vec<(String, u64)>,
}

/// Errors that prevent the computation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ComplianceErrors {
    EmptyRequirements,
    DuplicateLocation(String),
}

impl Error for ComplianceErrors {}

impl Display for ComplianceErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceErrors::EmptyRequirements => write!(f, "the requirement table is empty"),
            ComplianceErrors::DuplicateLocation(name) => {
                write!(f, "location {:?} appears twice in the requirement table", name)
            }
        }
    }
}
