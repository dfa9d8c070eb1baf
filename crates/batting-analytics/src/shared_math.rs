//! Pure return-series math for the metrics calculator.
//! Stateless functions over monthly fractional returns, no I/O.

use fund_core::stats;

/// Annualization factor. Returns are treated as monthly regardless of the
/// dates in the upload.
pub const PERIODS_PER_YEAR: f64 = 12.0;

/// Geometric annualized return: `prod(1 + r)^(12 / n) - 1`.
/// Returns 0 for an empty series.
pub fn annualized_return(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let growth: f64 = returns.iter().map(|r| 1.0 + r).product();
    growth.powf(PERIODS_PER_YEAR / returns.len() as f64) - 1.0
}

/// Sample standard deviation scaled by `sqrt(12)`. Returns 0 below two periods.
pub fn annualized_std(returns: &[f64]) -> f64 {
    stats::sample_std_dev(returns) * PERIODS_PER_YEAR.sqrt()
}

/// Per-period fund minus benchmark, truncated to the shorter input.
pub fn excess_returns(fund_returns: &[f64], benchmark_returns: &[f64]) -> Vec<f64> {
    fund_returns
        .iter()
        .zip(benchmark_returns.iter())
        .map(|(f, b)| f - b)
        .collect()
}

/// Tracking error: annualized std dev of the per-period excess returns.
pub fn tracking_error(excess_returns: &[f64]) -> f64 {
    annualized_std(excess_returns)
}

/// Return per unit of volatility with no risk-free rate.
/// A zero std dev produces a non-finite value, which is left to the caller.
pub fn sharpe_ratio(annualized_return: f64, annualized_std: f64) -> f64 {
    annualized_return / annualized_std
}

/// Annualized excess return per unit of tracking error.
/// Same non-finite behaviour as [`sharpe_ratio`].
pub fn information_ratio(annualized_excess_return: f64, tracking_error: f64) -> f64 {
    annualized_excess_return / tracking_error
}
