use fund_core::{BattingResult, BattingSummary, LabeledPeriod, PartitionKind, ReturnSeries};

/// Batting average of `series` over a single partition.
pub fn compute_batting(series: &ReturnSeries, partition: PartitionKind) -> BattingResult {
    batting_from_labeled(&series.labeled(), partition)
}

/// All three partitions from one labeling pass.
pub fn compute_all(series: &ReturnSeries) -> BattingSummary {
    let labeled = series.labeled();
    let summary = BattingSummary {
        all: batting_from_labeled(&labeled, PartitionKind::All),
        up: batting_from_labeled(&labeled, PartitionKind::BenchmarkPositive),
        down: batting_from_labeled(&labeled, PartitionKind::BenchmarkNegative),
    };

    tracing::debug!(
        "Batting: all {}/{}, up {}/{}, down {}/{}",
        summary.all.matched_count,
        summary.all.total_count,
        summary.up.matched_count,
        summary.up.total_count,
        summary.down.matched_count,
        summary.down.total_count
    );

    summary
}

/// Filter already-labeled periods to a partition and count the wins.
pub fn batting_from_labeled(labeled: &[LabeledPeriod], partition: PartitionKind) -> BattingResult {
    let rows: Vec<LabeledPeriod> = labeled
        .iter()
        .filter(|p| partition.contains(&p.period))
        .cloned()
        .collect();

    let total_count = rows.len();
    let matched_count = rows.iter().filter(|p| p.exceeds_benchmark).count();
    let average = if total_count == 0 {
        0.0
    } else {
        matched_count as f64 / total_count as f64
    };

    BattingResult {
        partition_kind: partition,
        matched_count,
        total_count,
        average,
        rows,
    }
}
