use fund_core::{
    FundFinalScore, FundIdentity, ReturnPeriod, ReturnSeries, ValidatedUpload, ValidationError,
};

use crate::workbook::{RawSection, RawWorkbook};

pub const FUND_INFO_SECTION: &str = "Fund Info";
pub const DATA_SECTION: &str = "Data";

pub const FUND_NAME: &str = "Fund Name";
pub const BENCHMARK_NAME: &str = "Benchmark Name";
pub const BENCHMARK_TICKER: &str = "Benchmark Ticker";
pub const FUND_INFO_COLUMNS: [&str; 3] = [FUND_NAME, BENCHMARK_NAME, BENCHMARK_TICKER];

pub const DATE: &str = "Date";
pub const FUND_RETURN: &str = "Fund Return";
pub const BENCHMARK_RETURN: &str = "Benchmark Return";
pub const DATA_COLUMNS: [&str; 3] = [DATE, FUND_RETURN, BENCHMARK_RETURN];

pub const FUND: &str = "Fund";
pub const FINAL: &str = "Final";
pub const FINAL_SCORE_COLUMNS: [&str; 2] = [FUND, FINAL];

/// Confirm an upload has the scoring layout and parse it.
///
/// Checks run in order and stop at the first failure: the "Fund Info" section
/// and its three columns, then the "Data" section and its three columns. The
/// identity comes from the first Fund Info row; every Data row becomes a
/// period, in file order.
pub fn validate(workbook: &RawWorkbook) -> Result<ValidatedUpload, ValidationError> {
    let fund_info = require_section(workbook, FUND_INFO_SECTION)?;
    let info_columns = require_columns(fund_info, &FUND_INFO_COLUMNS)?;

    let data = require_section(workbook, DATA_SECTION)?;
    let data_columns = require_columns(data, &DATA_COLUMNS)?;

    let identity = FundIdentity {
        fund_name: required_value(fund_info, FUND_NAME, 0, info_columns[0])?,
        benchmark_name: required_value(fund_info, BENCHMARK_NAME, 0, info_columns[1])?,
        benchmark_ticker: required_value(fund_info, BENCHMARK_TICKER, 0, info_columns[2])?,
    };

    let [date_col, fund_col, bench_col] = data_columns;
    let mut periods = Vec::with_capacity(data.rows.len());
    for row in 0..data.rows.len() {
        let date = data.cell(row, date_col).unwrap_or("").trim().to_string();
        let fund_return = parse_return(data, row, fund_col, FUND_RETURN)?;
        let benchmark_return = parse_return(data, row, bench_col, BENCHMARK_RETURN)?;
        periods.push(ReturnPeriod::new(date, fund_return, benchmark_return));
    }

    tracing::debug!(
        "Validated upload for '{}' with {} periods",
        identity.fund_name,
        periods.len()
    );

    Ok(ValidatedUpload {
        identity,
        series: ReturnSeries::new(periods),
    })
}

/// Validate a pre-computed distribution table exposing `Fund` and `Final`.
pub fn validate_final_scores(section: &RawSection) -> Result<Vec<FundFinalScore>, ValidationError> {
    let [fund_col, final_col] = require_columns(section, &FINAL_SCORE_COLUMNS)?;

    (0..section.rows.len())
        .map(|row| {
            let fund = required_value(section, FUND, row, fund_col)?;
            let final_score = parse_return(section, row, final_col, FINAL)?;
            Ok::<_, ValidationError>(FundFinalScore::new(fund, final_score))
        })
        .collect()
}

fn require_section<'a>(
    workbook: &'a RawWorkbook,
    name: &str,
) -> Result<&'a RawSection, ValidationError> {
    workbook
        .section(name)
        .ok_or_else(|| ValidationError::MissingSection(name.to_string()))
}

fn require_columns<const N: usize>(
    section: &RawSection,
    columns: &[&str; N],
) -> Result<[usize; N], ValidationError> {
    let mut indices = [0usize; N];
    for (slot, column) in indices.iter_mut().zip(columns.iter()) {
        *slot = section
            .column_index(column)
            .ok_or_else(|| ValidationError::MissingColumn {
                section: section.name.clone(),
                field: column.to_string(),
            })?;
    }
    Ok(indices)
}

fn required_value(
    section: &RawSection,
    field: &str,
    row: usize,
    column: usize,
) -> Result<String, ValidationError> {
    match section.cell(row, column).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ValidationError::MissingValue {
            section: section.name.clone(),
            field: field.to_string(),
        }),
    }
}

/// Parse a fractional return. Only surrounding whitespace is removed; a value
/// such as "1.5%" is rejected rather than rescaled.
fn parse_return(
    section: &RawSection,
    row: usize,
    column: usize,
    field: &str,
) -> Result<f64, ValidationError> {
    let raw = section.cell(row, column).unwrap_or("");
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::InvalidNumber {
            field: field.to_string(),
            row: row + 1,
            value: raw.to_string(),
        }),
    }
}
