use std::fs;
use std::path::{Path, PathBuf};

use crate::validator::{
    DATA_COLUMNS, DATA_SECTION, FINAL_SCORE_COLUMNS, FUND_INFO_COLUMNS, FUND_INFO_SECTION,
};
use crate::workbook::LoadError;

pub const DISTRIBUTION_TEMPLATE_FILE: &str = "final_scores_template.csv";

/// Write a blank scoring workbook into `dir`: `Fund Info.csv` and `Data.csv`
/// with their header rows only. Returns the paths written.
pub fn write_scoring_template(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(2);
    for (section, columns) in [
        (FUND_INFO_SECTION, &FUND_INFO_COLUMNS[..]),
        (DATA_SECTION, &DATA_COLUMNS[..]),
    ] {
        let path = dir.join(format!("{}.csv", section));
        write_headers(&path, section, columns)?;
        written.push(path);
    }

    tracing::info!("Wrote scoring template to {}", dir.display());
    Ok(written)
}

/// Write a blank `Fund,Final` table for the distribution view.
pub fn write_distribution_template(path: &Path) -> Result<(), LoadError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_headers(path, "Final Scores", &FINAL_SCORE_COLUMNS)
}

fn write_headers(path: &Path, section: &str, columns: &[&str]) -> Result<(), LoadError> {
    let to_load_error = |source| LoadError::Csv {
        section: section.to_string(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(to_load_error)?;
    writer.write_record(columns).map_err(to_load_error)?;
    writer.flush()?;
    Ok(())
}
