use crate::shared_math;
use fund_core::{ReturnSeries, RiskMetrics};

/// Compute annualized risk/return figures for a fund against its benchmark.
///
/// An empty series yields all-zero metrics. Dispersion-based fields need at
/// least two periods and are `0` otherwise, which in turn leaves the Sharpe
/// and information ratios non-finite.
pub fn compute_metrics(series: &ReturnSeries) -> RiskMetrics {
    if series.is_empty() {
        return RiskMetrics::default();
    }

    let fund = series.fund_returns();
    let bench = series.benchmark_returns();
    let excess = shared_math::excess_returns(&fund, &bench);

    let annualized_return_fund = shared_math::annualized_return(&fund);
    let annualized_return_benchmark = shared_math::annualized_return(&bench);
    let annualized_std_fund = shared_math::annualized_std(&fund);
    let annualized_std_benchmark = shared_math::annualized_std(&bench);

    let excess_return = shared_math::annualized_return(&excess);
    let tracking_error = shared_math::tracking_error(&excess);

    let metrics = RiskMetrics {
        annualized_return_fund,
        annualized_return_benchmark,
        annualized_std_fund,
        annualized_std_benchmark,
        excess_return,
        tracking_error,
        sharpe_fund: shared_math::sharpe_ratio(annualized_return_fund, annualized_std_fund),
        sharpe_benchmark: shared_math::sharpe_ratio(
            annualized_return_benchmark,
            annualized_std_benchmark,
        ),
        information_ratio: shared_math::information_ratio(excess_return, tracking_error),
    };

    let undefined = metrics.undefined_metrics();
    if !undefined.is_empty() {
        tracing::debug!(
            "{} periods left metrics undefined: {:?}",
            series.len(),
            undefined
        );
    }

    metrics
}
