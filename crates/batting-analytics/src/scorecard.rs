use crate::batting;
use crate::report::ScorecardBlocks;
use crate::risk_metrics;
use fund_core::{
    BattingSummary, FundIdentity, FundScoreRecord, LabeledPeriod, RiskMetrics, ValidatedUpload,
};
use serde::{Deserialize, Serialize};

/// Everything computed for one uploaded fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundScorecard {
    pub identity: FundIdentity,
    pub batting: BattingSummary,
    pub metrics: RiskMetrics,
    /// Every period with its excess return, in upload order.
    pub excess_rows: Vec<LabeledPeriod>,
}

impl FundScorecard {
    /// Score a validated upload: batting averages over the three partitions
    /// plus the annualized metrics.
    pub fn score(upload: &ValidatedUpload) -> Self {
        let batting = batting::compute_all(&upload.series);
        let metrics = risk_metrics::compute_metrics(&upload.series);

        tracing::info!(
            "Scored '{}' over {} periods: final score {:.4}",
            upload.identity.fund_name,
            upload.series.len(),
            batting.final_score()
        );

        Self {
            identity: upload.identity.clone(),
            excess_rows: batting.all.rows.clone(),
            batting,
            metrics,
        }
    }

    pub fn final_score(&self) -> f64 {
        self.batting.final_score()
    }

    /// The row persisted to the score store. Ratios are never stored.
    pub fn record(&self) -> FundScoreRecord {
        FundScoreRecord::new(&self.identity, &self.batting)
    }

    pub fn blocks(&self) -> ScorecardBlocks {
        ScorecardBlocks::from_scorecard(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fund_core::{ReturnPeriod, ReturnSeries};

    fn upload() -> ValidatedUpload {
        ValidatedUpload {
            identity: FundIdentity {
                fund_name: "Alpha Growth".to_string(),
                benchmark_name: "S&P 500".to_string(),
                benchmark_ticker: "SPY".to_string(),
            },
            series: ReturnSeries::new(vec![
                ReturnPeriod::new("2024-01-31", 0.02, 0.01),
                ReturnPeriod::new("2024-02-29", -0.01, -0.02),
                ReturnPeriod::new("2024-03-31", 0.00, 0.00),
                ReturnPeriod::new("2024-04-30", 0.01, 0.03),
            ]),
        }
    }

    #[test]
    fn test_score_upload() {
        let card = FundScorecard::score(&upload());
        assert!((card.batting.all.average - 0.5).abs() < 1e-10);
        assert!((card.batting.up.average - 0.5).abs() < 1e-10);
        assert!((card.batting.down.average - 1.0).abs() < 1e-10);
        assert!((card.final_score() - 0.75).abs() < 1e-10);
        assert_eq!(card.excess_rows.len(), 4);
    }

    #[test]
    fn test_record_holds_averages_only() {
        let card = FundScorecard::score(&upload());
        let record = card.record();
        assert_eq!(record.fund_name, "Alpha Growth");
        assert_eq!(record.benchmark_ticker, "SPY");
        assert!((record.all_time_average - 0.5).abs() < 1e-10);
        assert!((record.final_score() - card.final_score()).abs() < 1e-10);
        assert!(record.updated_at.is_none());
    }
}
