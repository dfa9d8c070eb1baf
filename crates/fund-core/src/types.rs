use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity fields from the "Fund Info" section of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundIdentity {
    pub fund_name: String,
    pub benchmark_name: String,
    pub benchmark_ticker: String,
}

/// A single period of fund and benchmark returns, as signed fractions
/// (0.0123 = 1.23%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnPeriod {
    pub date: String,
    pub fund_return: f64,
    pub benchmark_return: f64,
}

impl ReturnPeriod {
    pub fn new(date: impl Into<String>, fund_return: f64, benchmark_return: f64) -> Self {
        Self {
            date: date.into(),
            fund_return,
            benchmark_return,
        }
    }

    /// Strict comparison: a tie does not beat the benchmark.
    pub fn exceeds_benchmark(&self) -> bool {
        self.fund_return > self.benchmark_return
    }

    pub fn excess_return(&self) -> f64 {
        self.fund_return - self.benchmark_return
    }
}

/// A period together with the two columns derived during computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPeriod {
    #[serde(flatten)]
    pub period: ReturnPeriod,
    pub exceeds_benchmark: bool,
    pub excess_return: f64,
}

impl From<&ReturnPeriod> for LabeledPeriod {
    fn from(period: &ReturnPeriod) -> Self {
        Self {
            exceeds_benchmark: period.exceeds_benchmark(),
            excess_return: period.excess_return(),
            period: period.clone(),
        }
    }
}

/// Ordered, validated sequence of return periods.
///
/// The series is immutable once built; derived columns are produced by
/// [`ReturnSeries::labeled`] rather than written back into the periods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    periods: Vec<ReturnPeriod>,
}

impl ReturnSeries {
    pub fn new(periods: Vec<ReturnPeriod>) -> Self {
        Self { periods }
    }

    pub fn periods(&self) -> &[ReturnPeriod] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn fund_returns(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.fund_return).collect()
    }

    pub fn benchmark_returns(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.benchmark_return).collect()
    }

    /// Single labeling pass shared by every partition.
    pub fn labeled(&self) -> Vec<LabeledPeriod> {
        self.periods.iter().map(LabeledPeriod::from).collect()
    }
}

impl FromIterator<ReturnPeriod> for ReturnSeries {
    fn from_iter<I: IntoIterator<Item = ReturnPeriod>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Identity plus series, the output of a successful upload validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedUpload {
    pub identity: FundIdentity,
    pub series: ReturnSeries,
}

/// Which periods a batting average is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartitionKind {
    All,
    BenchmarkPositive,
    BenchmarkNegative,
}

impl PartitionKind {
    /// Zero benchmark returns fall in neither the positive nor the negative partition.
    pub fn contains(&self, period: &ReturnPeriod) -> bool {
        match self {
            PartitionKind::All => true,
            PartitionKind::BenchmarkPositive => period.benchmark_return > 0.0,
            PartitionKind::BenchmarkNegative => period.benchmark_return < 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PartitionKind::All => "All Time Performance",
            PartitionKind::BenchmarkPositive => "Up Benchmark Performance",
            PartitionKind::BenchmarkNegative => "Down Benchmark Performance",
        }
    }
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Batting average over one partition of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingResult {
    pub partition_kind: PartitionKind,
    pub matched_count: usize,
    pub total_count: usize,
    /// `matched_count / total_count`, or 0 for an empty partition.
    pub average: f64,
    /// The labeled periods that fall in this partition.
    pub rows: Vec<LabeledPeriod>,
}

/// The three batting results computed for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingSummary {
    pub all: BattingResult,
    pub up: BattingResult,
    pub down: BattingResult,
}

impl BattingSummary {
    pub fn final_score(&self) -> f64 {
        final_score(self.up.average, self.down.average)
    }

    pub fn results(&self) -> [&BattingResult; 3] {
        [&self.all, &self.up, &self.down]
    }
}

/// Annualized risk/return figures for a fund against its benchmark.
///
/// Ratios over a zero standard deviation are left non-finite; use
/// [`RiskMetrics::is_defined`] before displaying a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub annualized_return_fund: f64,
    pub annualized_return_benchmark: f64,
    pub annualized_std_fund: f64,
    pub annualized_std_benchmark: f64,
    /// Annualized return of the per-period excess series.
    pub excess_return: f64,
    pub tracking_error: f64,
    pub sharpe_fund: f64,
    pub sharpe_benchmark: f64,
    pub information_ratio: f64,
}

impl RiskMetrics {
    pub fn is_defined(value: f64) -> bool {
        value.is_finite()
    }

    /// Labeled metric/value list in display order.
    pub fn entries(&self) -> [(&'static str, f64); 9] {
        [
            ("Annualized Return (Fund)", self.annualized_return_fund),
            ("Annualized Return (Benchmark)", self.annualized_return_benchmark),
            ("Annualized Std Dev (Fund)", self.annualized_std_fund),
            ("Annualized Std Dev (Benchmark)", self.annualized_std_benchmark),
            ("Excess Return", self.excess_return),
            ("Tracking Error", self.tracking_error),
            ("Sharpe Ratio (Fund)", self.sharpe_fund),
            ("Sharpe Ratio (Benchmark)", self.sharpe_benchmark),
            ("Information Ratio", self.information_ratio),
        ]
    }

    pub fn undefined_metrics(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter(|(_, value)| !Self::is_defined(*value))
            .map(|(label, _)| label)
            .collect()
    }
}

/// Persisted summary row, one per fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundScoreRecord {
    pub fund_name: String,
    pub benchmark_name: String,
    pub benchmark_ticker: String,
    pub all_time_average: f64,
    pub up_benchmark_average: f64,
    pub down_benchmark_average: f64,
    /// Maintained by the store; ignored on upsert.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl FundScoreRecord {
    pub fn new(identity: &FundIdentity, batting: &BattingSummary) -> Self {
        Self {
            fund_name: identity.fund_name.clone(),
            benchmark_name: identity.benchmark_name.clone(),
            benchmark_ticker: identity.benchmark_ticker.clone(),
            all_time_average: batting.all.average,
            up_benchmark_average: batting.up.average,
            down_benchmark_average: batting.down.average,
            updated_at: None,
        }
    }

    /// Derived at read time, never stored.
    pub fn final_score(&self) -> f64 {
        final_score(self.up_benchmark_average, self.down_benchmark_average)
    }

    pub fn to_final_score(&self) -> FundFinalScore {
        FundFinalScore {
            fund: self.fund_name.clone(),
            final_score: self.final_score(),
        }
    }

    /// Equality on everything the caller controls.
    pub fn same_values(&self, other: &FundScoreRecord) -> bool {
        self.fund_name == other.fund_name
            && self.benchmark_name == other.benchmark_name
            && self.benchmark_ticker == other.benchmark_ticker
            && self.all_time_average == other.all_time_average
            && self.up_benchmark_average == other.up_benchmark_average
            && self.down_benchmark_average == other.down_benchmark_average
    }
}

/// A fund's composite score, the input to the distribution builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundFinalScore {
    pub fund: String,
    pub final_score: f64,
}

impl FundFinalScore {
    pub fn new(fund: impl Into<String>, final_score: f64) -> Self {
        Self {
            fund: fund.into(),
            final_score,
        }
    }
}

/// Average of the up-benchmark and down-benchmark batting averages.
pub fn final_score(up_benchmark_average: f64, down_benchmark_average: f64) -> f64 {
    (up_benchmark_average + down_benchmark_average) / 2.0
}
