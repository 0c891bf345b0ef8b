mod config;
pub mod manual;
use log::{debug, info, warn};

use std::collections::{BTreeMap, HashSet};

pub use crate::config::*;

// **** Private structures ****

// A (location, quarter) bucket.
type TallyKey = (String, FiscalQuarter);

/// Computes the compliance of each location against the requirement table.
///
/// Arguments:
/// * `coll` the observations, in any order
/// * `requirements` the locations to report on, with their quarterly requirement
///
/// Observations for locations that are not in the requirement table are not
/// scored. They are returned in `unrecognized_locations`.
pub fn run_compliance_stats(
    coll: &[Observation],
    requirements: &RequirementTable,
) -> Result<ComplianceResult, ComplianceErrors> {
    info!(
        "Processing {:?} observations against {:?} locations",
        coll.len(),
        requirements.len()
    );
    if requirements.is_empty() {
        return Err(ComplianceErrors::EmptyRequirements);
    }

    let grouped = group_by_quarter(coll);
    debug!("run_compliance_stats: {:?} non-empty groups", grouped.len());

    let tally = complete_tally(&grouped, requirements);
    let matrix = build_matrix(&tally, requirements);
    let unrecognized_locations = find_unrecognized(&grouped, requirements);

    if !unrecognized_locations.is_empty() {
        let total: u64 = unrecognized_locations.iter().map(|(_, c)| c).sum();
        warn!(
            "{} observations have a location without requirement and were not scored: {:?}",
            total, unrecognized_locations
        );
    }

    Ok(ComplianceResult {
        tally,
        matrix,
        unrecognized_locations,
    })
}

/// The percentage of the requirement that a tally reaches, capped at 100.
///
/// A requirement that is zero or negative cannot be met: the percentage is 0.
pub fn percentage_met(count: u64, requirement: i64) -> f64 {
    if requirement <= 0 {
        return 0.0;
    }
    let pct = (count as f64) * 100.0 / (requirement as f64);
    pct.min(100.0)
}

fn group_by_quarter(coll: &[Observation]) -> BTreeMap<TallyKey, u64> {
    let mut grouped: BTreeMap<TallyKey, u64> = BTreeMap::new();
    for obs in coll.iter() {
        let quarter = FiscalQuarter::of(&obs.date);
        *grouped.entry((obs.location.clone(), quarter)).or_insert(0) += 1;
    }
    grouped
}

// The tally over the full key space: every location of the table, every quarter,
// in table order. Missing combinations are zero.
fn complete_tally(
    grouped: &BTreeMap<TallyKey, u64>,
    requirements: &RequirementTable,
) -> Vec<TallyCell> {
    let mut tally: Vec<TallyCell> = Vec::with_capacity(requirements.len() * 4);
    for location in requirements.locations() {
        for quarter in FiscalQuarter::ALL {
            let count = grouped
                .get(&(location.to_string(), quarter))
                .cloned()
                .unwrap_or(0);
            tally.push(TallyCell {
                location: location.to_string(),
                quarter,
                count,
            });
        }
    }
    tally
}

fn build_matrix(tally: &[TallyCell], requirements: &RequirementTable) -> ComplianceMatrix {
    let mut rows: Vec<ComplianceRow> = Vec::with_capacity(requirements.len());
    for (location, requirement) in requirements.entries() {
        let mut counts = [0u64; 4];
        for cell in tally.iter().filter(|c| c.location == *location) {
            counts[cell.quarter.index()] = cell.count;
        }
        let percentages = counts.map(|count| percentage_met(count, *requirement));
        debug!(
            "build_matrix: {}: requirement {} tally {:?} -> {:?}",
            location, requirement, counts, percentages
        );
        rows.push(ComplianceRow {
            location: location.clone(),
            requirement: *requirement,
            tally: counts,
            percentages,
        });
    }
    rows.sort_by(|a, b| a.location.cmp(&b.location));
    ComplianceMatrix { rows }
}

fn find_unrecognized(
    grouped: &BTreeMap<TallyKey, u64>,
    requirements: &RequirementTable,
) -> Vec<(String, u64)> {
    let known: HashSet<&str> = requirements.locations().collect();
    let mut res: BTreeMap<String, u64> = BTreeMap::new();
    for ((location, _), count) in grouped.iter() {
        if !known.contains(location.as_str()) {
            *res.entry(location.clone()).or_insert(0) += count;
        }
    }
    res.into_iter().collect()
}
