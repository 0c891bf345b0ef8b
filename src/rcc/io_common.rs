use std::env;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use snafu::OptionExt;

use crate::rcc::{MissingFileNameSnafu, MissingHomeDirSnafu, RccResult};

/// Name of a file, without its directory and its extension.
pub fn simplify_file_name(path: &str) -> RccResult<String> {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .context(MissingFileNameSnafu { path })?;
    Ok(stem.to_string())
}

/// `<input name>_RESULTS_<YYYY-MM-DD_HH-MM-SS>.xlsx`
pub fn report_file_name(input_path: &str, at: &NaiveDateTime) -> RccResult<String> {
    let stem = simplify_file_name(input_path)?;
    Ok(format!(
        "{}_RESULTS_{}.xlsx",
        stem,
        at.format("%Y-%m-%d_%H-%M-%S")
    ))
}

pub fn report_path(out_dir: &Path, input_path: &str, at: &NaiveDateTime) -> RccResult<PathBuf> {
    Ok(out_dir.join(report_file_name(input_path, at)?))
}

/// The Downloads folder in the home directory of the user.
pub fn downloads_dir() -> RccResult<PathBuf> {
    let vars = if cfg!(windows) {
        ["USERPROFILE", "HOME"]
    } else {
        ["HOME", "USERPROFILE"]
    };
    let home = vars
        .iter()
        .filter_map(|v| env::var_os(v))
        .find(|h| !h.is_empty())
        .context(MissingHomeDirSnafu {})?;
    Ok(PathBuf::from(home).join("Downloads"))
}

/// Excel-style name of a zero-based column index (0 -> A, 26 -> AA).
pub fn column_name(idx: u32) -> String {
    let mut n = idx + 1;
    let mut letters: Vec<char> = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 3)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    #[test]
    fn report_name() {
        assert_eq!(
            report_file_name("/data/forms/Observations (Responses).xlsx", &at()).unwrap(),
            "Observations (Responses)_RESULTS_2024-11-03_14-05-09.xlsx"
        );
        assert_eq!(
            report_path(Path::new("/home/me/Downloads"), "obs.xlsx", &at()).unwrap(),
            PathBuf::from("/home/me/Downloads/obs_RESULTS_2024-11-03_14-05-09.xlsx")
        );
    }

    #[test]
    fn only_the_last_extension_is_removed() {
        assert_eq!(simplify_file_name("q1.backup.xlsx").unwrap(), "q1.backup");
        assert_eq!(simplify_file_name("noext").unwrap(), "noext");
        assert!(simplify_file_name("").is_err());
    }

    #[test]
    fn column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(7), "H");
        assert_eq!(column_name(8), "I");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
    }
}
