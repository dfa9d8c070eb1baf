use crate::scorecard::FundScorecard;
use fund_core::{BattingResult, Cell, TabularBlock};

pub const FINAL_SCORES_TITLE: &str = "Final Scores";
pub const EXCESS_RETURN_TITLE: &str = "Excess Return";

const BATTING_HEADERS: [&str; 5] = ["Date", "Fund Return", "Benchmark Return", "check", "batting"];
const EXCESS_HEADERS: [&str; 4] = ["Date", "Fund Return", "Benchmark Return", "Excess Return"];

/// The independent tables exported for one scorecard.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorecardBlocks {
    pub final_scores: TabularBlock,
    pub all: TabularBlock,
    pub up: TabularBlock,
    pub down: TabularBlock,
    pub excess: TabularBlock,
}

impl ScorecardBlocks {
    pub fn from_scorecard(card: &FundScorecard) -> Self {
        Self {
            final_scores: final_scores_block(card),
            all: batting_block(&card.batting.all),
            up: batting_block(&card.batting.up),
            down: batting_block(&card.batting.down),
            excess: excess_block(card),
        }
    }

    /// Batting tables in left-to-right sheet order.
    pub fn batting_blocks(&self) -> [&TabularBlock; 3] {
        [&self.all, &self.up, &self.down]
    }
}

/// Metric/value pairs: the three averages, the final score, then every risk metric.
fn final_scores_block(card: &FundScorecard) -> TabularBlock {
    let mut block = TabularBlock::new(FINAL_SCORES_TITLE, &["Metric", "Value"]);
    for result in card.batting.results() {
        block.push_row(vec![
            Cell::text(format!("{} Batting Average", result.partition_kind.label())),
            Cell::Number(result.average),
        ]);
    }
    block.push_row(vec![Cell::text("Final Score"), Cell::Number(card.final_score())]);
    for (label, value) in card.metrics.entries() {
        block.push_row(vec![Cell::text(label), Cell::Number(value)]);
    }
    block
}

/// Partition rows with the 1/0 check column. The batting value sits on the
/// first row only; the rest of that column is blank.
fn batting_block(result: &BattingResult) -> TabularBlock {
    let mut block = TabularBlock::new(result.partition_kind.label(), &BATTING_HEADERS);
    for (i, row) in result.rows.iter().enumerate() {
        block.push_row(vec![
            Cell::text(row.period.date.as_str()),
            Cell::Number(row.period.fund_return),
            Cell::Number(row.period.benchmark_return),
            Cell::Flag(row.exceeds_benchmark),
            if i == 0 {
                Cell::Number(result.average)
            } else {
                Cell::Empty
            },
        ]);
    }
    block
}

fn excess_block(card: &FundScorecard) -> TabularBlock {
    let mut block = TabularBlock::new(EXCESS_RETURN_TITLE, &EXCESS_HEADERS);
    for row in &card.excess_rows {
        block.push_row(vec![
            Cell::text(row.period.date.as_str()),
            Cell::Number(row.period.fund_return),
            Cell::Number(row.period.benchmark_return),
            Cell::Number(row.excess_return),
        ]);
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use fund_core::{FundIdentity, ReturnPeriod, ReturnSeries, ValidatedUpload};

    fn card() -> FundScorecard {
        FundScorecard::score(&ValidatedUpload {
            identity: FundIdentity {
                fund_name: "Alpha Growth".to_string(),
                benchmark_name: "S&P 500".to_string(),
                benchmark_ticker: "SPY".to_string(),
            },
            series: ReturnSeries::new(vec![
                ReturnPeriod::new("2024-01-31", 0.02, 0.01),
                ReturnPeriod::new("2024-02-29", 0.01, 0.01),
                ReturnPeriod::new("2024-03-31", 0.01, 0.02),
            ]),
        })
    }

    #[test]
    fn test_final_scores_block() {
        let blocks = card().blocks();
        // 3 averages + final score + 9 metrics
        assert_eq!(blocks.final_scores.rows.len(), 13);
        assert_eq!(
            blocks.final_scores.rows[0][0],
            Cell::text("All Time Performance Batting Average")
        );
        assert_eq!(blocks.final_scores.rows[3][0], Cell::text("Final Score"));
        assert_eq!(blocks.final_scores.rows[12][0], Cell::text("Information Ratio"));
    }

    #[test]
    fn test_batting_value_only_on_first_row() {
        let blocks = card().blocks();
        let up = &blocks.up;
        assert_eq!(up.rows.len(), 3);
        let batting_col = up.column("batting").unwrap();
        assert_eq!(up.rows[0][batting_col], Cell::Number(1.0 / 3.0));
        assert_eq!(up.rows[1][batting_col], Cell::Empty);
        assert_eq!(up.rows[0][up.column("check").unwrap()], Cell::Flag(true));
        assert_eq!(up.rows[1][up.column("check").unwrap()], Cell::Flag(false));
    }

    #[test]
    fn test_empty_partition_block_has_headers_only() {
        let blocks = card().blocks();
        assert!(blocks.down.rows.is_empty());
        assert_eq!(blocks.down.height(), 1);
        assert_eq!(blocks.down.width(), 5);
        assert_eq!(blocks.down.title, "Down Benchmark Performance");
    }

    #[test]
    fn test_excess_block() {
        let blocks = card().blocks();
        assert_eq!(blocks.excess.headers.last().map(String::as_str), Some("Excess Return"));
        match blocks.excess.rows[2][3] {
            Cell::Number(v) => assert!((v + 0.01).abs() < 1e-10),
            ref other => panic!("unexpected cell {:?}", other),
        }
    }
}
