use batting_analytics::FundScorecard;
use bell_curve::DistributionModel;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use fund_core::{FundScoreRecord, RiskMetrics};
use score_store::SnapshotInfo;

/// Whole-percent display, e.g. 0.666 -> "67%".
pub fn percent(value: f64) -> String {
    if !RiskMetrics::is_defined(value) {
        return "undefined".to_string();
    }
    format!("{}%", (value * 100.0).round())
}

/// Ratios are shown to two decimals; returns and volatilities as percentages.
fn metric_value(label: &str, value: f64) -> String {
    if !RiskMetrics::is_defined(value) {
        "undefined".to_string()
    } else if label.contains("Ratio") {
        format!("{:.2}", value)
    } else {
        format!("{:.2}%", value * 100.0)
    }
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    table
}

pub fn scorecard_table(card: &FundScorecard) -> Table {
    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec!["Fund".to_string(), card.identity.fund_name.clone()]);
    table.add_row(vec![
        "Benchmark".to_string(),
        format!(
            "{} ({})",
            card.identity.benchmark_name, card.identity.benchmark_ticker
        ),
    ]);
    for result in card.batting.results() {
        table.add_row(vec![
            result.partition_kind.label().to_string(),
            format!(
                "{} ({}/{})",
                percent(result.average),
                result.matched_count,
                result.total_count
            ),
        ]);
    }
    table.add_row(vec!["Final Score".to_string(), percent(card.final_score())]);
    for (label, value) in card.metrics.entries() {
        table.add_row(vec![label.to_string(), metric_value(label, value)]);
    }
    table
}

pub fn records_table(records: &[FundScoreRecord]) -> Table {
    let mut table = new_table(&[
        "Fund",
        "Benchmark",
        "Ticker",
        "All Time",
        "Up Benchmark",
        "Down Benchmark",
        "Final",
        "Updated",
    ]);
    for record in records {
        table.add_row(vec![
            record.fund_name.clone(),
            record.benchmark_name.clone(),
            record.benchmark_ticker.clone(),
            percent(record.all_time_average),
            percent(record.up_benchmark_average),
            percent(record.down_benchmark_average),
            percent(record.final_score()),
            record.updated_at.clone().unwrap_or_default(),
        ]);
    }
    table
}

pub fn snapshots_table(snapshots: &[SnapshotInfo]) -> Table {
    let mut table = new_table(&["Snapshot", "Size (bytes)"]);
    for snapshot in snapshots {
        table.add_row(vec![snapshot.file_name.clone(), snapshot.size_bytes.to_string()]);
    }
    table
}

/// Funds by descending score with their placement on the curve.
pub fn distribution_table(model: &DistributionModel) -> Table {
    let mut points: Vec<_> = model.points.iter().collect();
    points.sort_by(|a, b| b.x.partial_cmp(&a.x).unwrap_or(std::cmp::Ordering::Equal));

    let mut table = new_table(&["Fund", "Final", "z-score", "Top"]);
    for point in points {
        let z = if model.is_degenerate() {
            0.0
        } else {
            (point.x - model.mean) / model.std_dev
        };
        table.add_row(vec![
            point.fund.clone(),
            percent(point.x),
            format!("{:+.2}", z),
            if point.highlight { "*" } else { "" }.to_string(),
        ]);
    }
    table
}
