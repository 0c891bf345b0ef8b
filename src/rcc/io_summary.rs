// JSON summary of a run.

use log::debug;

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use compliance_tally::{ComplianceResult, FiscalQuarter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use snafu::ResultExt;

use crate::rcc::{RccResult, SerializingJsonSnafu, WritingJsonSnafu};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    pub input: String,
    pub report: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
    #[serde(rename = "fiscalYearStart")]
    pub fiscal_year_start: String,
}

fn quarter_map<T: Serialize>(values: &[T; 4]) -> JSMap<String, JSValue> {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    for quarter in FiscalQuarter::ALL {
        m.insert(quarter.label().to_string(), json!(values[quarter.index()]));
    }
    m
}

fn result_rows_to_json(res: &ComplianceResult) -> Vec<JSValue> {
    res.matrix
        .rows
        .iter()
        .map(|row| {
            json!({
                "location": row.location,
                "requirement": row.requirement,
                "tally": quarter_map(&row.tally),
                "percentageMet": quarter_map(&row.percentages),
            })
        })
        .collect()
}

pub fn build_summary_js(
    input: &str,
    report: &Path,
    generated_at: &NaiveDateTime,
    res: &ComplianceResult,
) -> JSValue {
    let c = SummaryConfig {
        input: input.to_string(),
        report: report.display().to_string(),
        generated_at: generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        fiscal_year_start: "October".to_string(),
    };
    let unrecognized: Vec<JSValue> = res
        .unrecognized_locations
        .iter()
        .map(|(location, count)| json!({"location": location, "count": count}))
        .collect();
    json!({
        "config": c,
        "results": result_rows_to_json(res),
        "unrecognizedLocations": unrecognized,
    })
}

/// Writes the summary to the given file, or to the standard output for 'stdout'.
pub fn write_summary(out: &str, js: &JSValue) -> RccResult<()> {
    let pretty = serde_json::to_string_pretty(js).context(SerializingJsonSnafu {})?;
    if out == "stdout" {
        println!("{}", pretty);
    } else {
        debug!("write_summary: writing {} bytes to {:?}", pretty.len(), out);
        fs::write(out, pretty).context(WritingJsonSnafu { path: out })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use compliance_tally::{run_compliance_stats, Observation, RequirementTable};

    #[test]
    fn summary_fields() {
        let table = RequirementTable::new(&[("Mobile", 2), ("Evans", 4)]).unwrap();
        let d = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let coll = vec![
            Observation::new("Evans", d),
            Observation::new("Mobil", d),
        ];
        let res = run_compliance_stats(&coll, &table).unwrap();
        let at = d.and_hms_opt(7, 0, 0).unwrap();
        let js = build_summary_js("in.xlsx", Path::new("out.xlsx"), &at, &res);

        let c: SummaryConfig = serde_json::from_value(js["config"].clone()).unwrap();
        assert_eq!(c.generated_at, "2025-08-01T07:00:00");
        assert_eq!(c.input, "in.xlsx");

        let rows = js["results"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["location"], "Evans");
        assert_eq!(rows[0]["tally"]["Q4"], 1);
        assert_eq!(rows[0]["percentageMet"]["Q4"], 25.0);
        assert_eq!(rows[1]["location"], "Mobile");
        assert_eq!(rows[1]["percentageMet"]["Q1"], 0.0);
        assert_eq!(
            js["unrecognizedLocations"],
            json!([{"location": "Mobil", "count": 1}])
        );
    }
}
