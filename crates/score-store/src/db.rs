use fund_core::StoreError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

#[derive(Clone)]
pub struct ScoreDb {
    pool: SqlitePool,
}

impl ScoreDb {
    /// Open (creating if needed) the database and apply the schema.
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(db_error)?
            .create_if_missing(true);

        // Every in-memory connection is its own database, so keep a single one
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(db_error)?;

        let db = Self { pool };
        db.init_schema().await?;

        tracing::debug!("Opened score database {}", database_url);
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("../../../schema.sql");

        // sqlx runs one statement per query
        for statement in schema.split(';') {
            let stmt = strip_comments(statement);
            if !stmt.is_empty() {
                sqlx::query(&stmt)
                    .execute(&self.pool)
                    .await
                    .map_err(db_error)?;
            }
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn strip_comments(statement: &str) -> String {
    statement
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub(crate) fn db_error(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_db_creation() {
        let db = ScoreDb::new("sqlite::memory:").await.unwrap();
        assert!(db.pool().acquire().await.is_ok());

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM batting_averages")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("funds.db");
        let url = format!("sqlite:{}", path.display());

        assert!(!path.exists());
        ScoreDb::new(&url).await.unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("-- note\nCREATE TABLE t (id INTEGER)\n"), "CREATE TABLE t (id INTEGER)");
        assert_eq!(strip_comments("\n  -- trailing\n"), "");
    }
}
