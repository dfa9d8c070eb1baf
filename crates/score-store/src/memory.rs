use async_trait::async_trait;
use fund_core::{FundScoreRecord, ScoreStore, StoreError};
use tokio::sync::RwLock;

/// Same format as SQLite's `CURRENT_TIMESTAMP`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// In-process store for tests and dry runs. Keeps first-insertion order.
#[derive(Default)]
pub struct MemoryScoreStore {
    records: RwLock<Vec<FundScoreRecord>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn upsert(&self, record: &FundScoreRecord) -> Result<(), StoreError> {
        let mut stored = record.clone();
        stored.updated_at = Some(now());

        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.fund_name == record.fund_name) {
            Some(existing) => *existing = stored,
            None => records.push(stored),
        }
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<FundScoreRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn fetch(&self, fund_name: &str) -> Result<Option<FundScoreRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.fund_name == fund_name)
            .cloned())
    }

    async fn delete(&self, fund_name: &str, confirmed: bool) -> Result<(), StoreError> {
        if !confirmed {
            return Err(StoreError::ConfirmationRequired(fund_name.to_string()));
        }

        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.fund_name != fund_name);
        if records.len() == before {
            return Err(StoreError::NotFound(fund_name.to_string()));
        }
        Ok(())
    }

    async fn replace_all(&self, records: &[FundScoreRecord]) -> Result<(), StoreError> {
        let mut replacement: Vec<FundScoreRecord> = Vec::with_capacity(records.len());
        for record in records {
            if replacement.iter().any(|r| r.fund_name == record.fund_name) {
                return Err(StoreError::Database(format!(
                    "duplicate fund_name '{}'",
                    record.fund_name
                )));
            }
            let mut stored = record.clone();
            stored.updated_at = stored.updated_at.or_else(|| Some(now()));
            replacement.push(stored);
        }

        *self.records.write().await = replacement;
        Ok(())
    }
}
