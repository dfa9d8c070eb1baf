use async_trait::async_trait;
use fund_core::{FundScoreRecord, ScoreStore, StoreError};

use crate::db::{db_error, ScoreDb};

#[derive(Debug, Clone, sqlx::FromRow)]
struct DbFundScore {
    fund_name: String,
    benchmark_name: String,
    benchmark_ticker: String,
    all_time_average: f64,
    up_benchmark_average: f64,
    down_benchmark_average: f64,
    updated_at: Option<String>,
}

impl From<DbFundScore> for FundScoreRecord {
    fn from(row: DbFundScore) -> Self {
        Self {
            fund_name: row.fund_name,
            benchmark_name: row.benchmark_name,
            benchmark_ticker: row.benchmark_ticker,
            all_time_average: row.all_time_average,
            up_benchmark_average: row.up_benchmark_average,
            down_benchmark_average: row.down_benchmark_average,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = "SELECT fund_name, benchmark_name, benchmark_ticker, all_time_average, \
     up_benchmark_average, down_benchmark_average, updated_at FROM batting_averages";

/// SQLite-backed score store.
#[derive(Clone)]
pub struct SqliteScoreStore {
    db: ScoreDb,
}

impl SqliteScoreStore {
    pub fn new(db: ScoreDb) -> Self {
        Self { db }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(ScoreDb::new(database_url).await?))
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn upsert(&self, record: &FundScoreRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO batting_averages (
                fund_name, benchmark_name, benchmark_ticker,
                all_time_average, up_benchmark_average, down_benchmark_average, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(fund_name) DO UPDATE SET
                benchmark_name = excluded.benchmark_name,
                benchmark_ticker = excluded.benchmark_ticker,
                all_time_average = excluded.all_time_average,
                up_benchmark_average = excluded.up_benchmark_average,
                down_benchmark_average = excluded.down_benchmark_average,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&record.fund_name)
        .bind(&record.benchmark_name)
        .bind(&record.benchmark_ticker)
        .bind(record.all_time_average)
        .bind(record.up_benchmark_average)
        .bind(record.down_benchmark_average)
        .execute(self.db.pool())
        .await
        .map_err(db_error)?;

        tracing::info!("Saved batting averages for '{}'", record.fund_name);
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<FundScoreRecord>, StoreError> {
        let rows = sqlx::query_as::<_, DbFundScore>(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .fetch_all(self.db.pool())
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(FundScoreRecord::from).collect())
    }

    async fn fetch(&self, fund_name: &str) -> Result<Option<FundScoreRecord>, StoreError> {
        let row = sqlx::query_as::<_, DbFundScore>(&format!("{} WHERE fund_name = ?", SELECT_COLUMNS))
            .bind(fund_name)
            .fetch_optional(self.db.pool())
            .await
            .map_err(db_error)?;

        Ok(row.map(FundScoreRecord::from))
    }

    async fn delete(&self, fund_name: &str, confirmed: bool) -> Result<(), StoreError> {
        if !confirmed {
            return Err(StoreError::ConfirmationRequired(fund_name.to_string()));
        }

        let result = sqlx::query("DELETE FROM batting_averages WHERE fund_name = ?")
            .bind(fund_name)
            .execute(self.db.pool())
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(fund_name.to_string()));
        }

        tracing::info!("Deleted fund '{}'", fund_name);
        Ok(())
    }

    async fn replace_all(&self, records: &[FundScoreRecord]) -> Result<(), StoreError> {
        let mut tx = self.db.pool().begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM batting_averages")
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO batting_averages (
                    fund_name, benchmark_name, benchmark_ticker,
                    all_time_average, up_benchmark_average, down_benchmark_average, updated_at
                )
                VALUES (?, ?, ?, ?, ?, ?, COALESCE(?, CURRENT_TIMESTAMP))
                "#,
            )
            .bind(&record.fund_name)
            .bind(&record.benchmark_name)
            .bind(&record.benchmark_ticker)
            .bind(record.all_time_average)
            .bind(record.up_benchmark_average)
            .bind(record.down_benchmark_average)
            .bind(&record.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        tracing::info!("Replaced score table with {} records", records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, up: f64, down: f64) -> FundScoreRecord {
        FundScoreRecord {
            fund_name: name.to_string(),
            benchmark_name: "S&P 500".to_string(),
            benchmark_ticker: "SPY".to_string(),
            all_time_average: 0.5,
            up_benchmark_average: up,
            down_benchmark_average: down,
            updated_at: None,
        }
    }

    async fn store() -> SqliteScoreStore {
        SqliteScoreStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_by_name() {
        let store = store().await;
        store.upsert(&record("Alpha", 0.4, 0.6)).await.unwrap();
        store.upsert(&record("Alpha", 0.7, 0.9)).await.unwrap();

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!((all[0].up_benchmark_average - 0.7).abs() < 1e-10);
        assert!((all[0].final_score() - 0.8).abs() < 1e-10);
        assert!(all[0].updated_at.is_some());
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_insertion_order() {
        let store = store().await;
        for name in ["Gamma", "Alpha", "Beta"] {
            store.upsert(&record(name, 0.5, 0.5)).await.unwrap();
        }
        // Updating an existing fund does not move it
        store.upsert(&record("Gamma", 0.1, 0.1)).await.unwrap();

        let names: Vec<String> = store
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.fund_name)
            .collect();
        assert_eq!(names, vec!["Gamma", "Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn test_fetch_single() {
        let store = store().await;
        store.upsert(&record("Alpha", 0.4, 0.6)).await.unwrap();
        let found = store.fetch("Alpha").await.unwrap().unwrap();
        assert!(found.same_values(&record("Alpha", 0.4, 0.6)));
        assert!(store.fetch("Missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let store = store().await;
        store.upsert(&record("Alpha", 0.4, 0.6)).await.unwrap();

        let err = store.delete("Alpha", false).await.unwrap_err();
        assert!(matches!(err, StoreError::ConfirmationRequired(_)));
        assert_eq!(store.fetch_all().await.unwrap().len(), 1);

        store.delete("Alpha", true).await.unwrap();
        assert!(store.fetch_all().await.unwrap().is_empty());

        let err = store.delete("Alpha", true).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_replace_all() {
        let store = store().await;
        store.upsert(&record("Old", 0.1, 0.2)).await.unwrap();

        let mut restored = record("Alpha", 0.4, 0.6);
        restored.updated_at = Some("2024-06-30 12:00:00".to_string());
        store
            .replace_all(&[restored.clone(), record("Beta", 0.3, 0.3)])
            .await
            .unwrap();

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].same_values(&restored));
        assert_eq!(all[0].updated_at.as_deref(), Some("2024-06-30 12:00:00"));
        assert!(store.fetch("Old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_all_rolls_back_on_duplicate() {
        let store = store().await;
        store.upsert(&record("Keep", 0.1, 0.2)).await.unwrap();

        let result = store
            .replace_all(&[record("Dup", 0.5, 0.5), record("Dup", 0.6, 0.6)])
            .await;
        assert!(matches!(result, Err(StoreError::Database(_))));

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].fund_name, "Keep");
    }
}
