pub mod batting;
pub mod report;
pub mod risk_metrics;
pub mod scorecard;
pub mod shared_math;

pub use batting::{compute_all, compute_batting};
pub use report::ScorecardBlocks;
pub use risk_metrics::compute_metrics;
pub use scorecard::FundScorecard;
