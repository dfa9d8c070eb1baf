use async_trait::async_trait;

use crate::{FundScoreRecord, StoreError};

/// Durable table of one summary row per fund, keyed by `fund_name`.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Insert the record, or overwrite the row with the same `fund_name`.
    async fn upsert(&self, record: &FundScoreRecord) -> Result<(), StoreError>;

    /// Every record, in first-insertion order.
    async fn fetch_all(&self) -> Result<Vec<FundScoreRecord>, StoreError>;

    async fn fetch(&self, fund_name: &str) -> Result<Option<FundScoreRecord>, StoreError>;

    /// Remove a fund. Refused with `ConfirmationRequired` unless `confirmed`.
    async fn delete(&self, fund_name: &str, confirmed: bool) -> Result<(), StoreError>;

    /// Replace the whole table atomically (used by snapshot restore).
    async fn replace_all(&self, records: &[FundScoreRecord]) -> Result<(), StoreError>;
}
