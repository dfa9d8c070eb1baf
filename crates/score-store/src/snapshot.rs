use chrono::{DateTime, Local, Utc};
use fund_core::{FundScoreRecord, ScoreStore, StoreError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_PREFIX: &str = "funds_backup_";
pub const SNAPSHOT_EXTENSION: &str = "json";

/// Full copy of the score table at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub created_at: DateTime<Utc>,
    pub records: Vec<FundScoreRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
}

/// Writes and restores JSON snapshots in a backup directory.
pub struct SnapshotManager {
    dir: PathBuf,
}

impl SnapshotManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every record in `store` to `funds_backup_<YYYYmmdd_HHMMSS>.json`.
    pub async fn create(&self, store: &dyn ScoreStore) -> Result<PathBuf, StoreError> {
        let records = store.fetch_all().await?;
        let snapshot = Snapshot {
            created_at: Utc::now(),
            records,
        };

        fs::create_dir_all(&self.dir)?;
        let path = self.next_path();
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::Snapshot(e.to_string()))?;
        fs::write(&path, json)?;

        tracing::info!(
            "Backed up {} records to {}",
            snapshot.records.len(),
            path.display()
        );
        Ok(path)
    }

    /// Replace the store's contents with a snapshot. Returns the record count.
    pub async fn restore(&self, store: &dyn ScoreStore, path: &Path) -> Result<usize, StoreError> {
        let snapshot = Self::read(path)?;
        store.replace_all(&snapshot.records).await?;

        tracing::info!(
            "Restored {} records from {}",
            snapshot.records.len(),
            path.display()
        );
        Ok(snapshot.records.len())
    }

    pub fn read(path: &Path) -> Result<Snapshot, StoreError> {
        if !path.is_file() {
            return Err(StoreError::SnapshotNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| StoreError::Snapshot(format!("{}: {}", path.display(), e)))
    }

    /// Snapshots in the backup directory, newest first.
    pub fn list(&self) -> Result<Vec<SnapshotInfo>, StoreError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !is_snapshot_name(&file_name) {
                continue;
            }
            snapshots.push(SnapshotInfo {
                path: entry.path(),
                file_name,
                size_bytes: entry.metadata()?.len(),
            });
        }

        // Timestamped names sort chronologically
        snapshots.sort_by(|a, b| b.file_name.cmp(&a.file_name));
        Ok(snapshots)
    }

    pub fn latest(&self) -> Result<Option<SnapshotInfo>, StoreError> {
        Ok(self.list()?.into_iter().next())
    }

    fn next_path(&self) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let base = format!("{}{}", SNAPSHOT_PREFIX, stamp);

        let mut path = self.dir.join(format!("{}.{}", base, SNAPSHOT_EXTENSION));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{}_{}.{}", base, n, SNAPSHOT_EXTENSION));
            n += 1;
        }
        path
    }
}

fn is_snapshot_name(name: &str) -> bool {
    name.starts_with(SNAPSHOT_PREFIX) && name.ends_with(&format!(".{}", SNAPSHOT_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryScoreStore;
    use crate::sqlite::SqliteScoreStore;

    fn record(name: &str, up: f64, down: f64) -> FundScoreRecord {
        FundScoreRecord {
            fund_name: name.to_string(),
            benchmark_name: "MSCI World".to_string(),
            benchmark_ticker: "URTH".to_string(),
            all_time_average: 0.55,
            up_benchmark_average: up,
            down_benchmark_average: down,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_snapshot_then_restore_reproduces_table() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path().join("backups"));
        let store = SqliteScoreStore::connect("sqlite::memory:").await.unwrap();

        store.upsert(&record("Alpha", 0.6, 0.4)).await.unwrap();
        store.upsert(&record("Beta", 0.3, 0.7)).await.unwrap();
        let before = store.fetch_all().await.unwrap();

        let path = manager.create(&store).await.unwrap();
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(SNAPSHOT_PREFIX));

        store.delete("Alpha", true).await.unwrap();
        store.upsert(&record("Gamma", 0.1, 0.1)).await.unwrap();

        let restored = manager.restore(&store, &path).await.unwrap();
        assert_eq!(restored, 2);
        assert_eq!(store.fetch_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path());
        let store = MemoryScoreStore::new();
        store.upsert(&record("Alpha", 0.6, 0.4)).await.unwrap();

        let first = manager.create(&store).await.unwrap();
        let second = manager.create(&store).await.unwrap();
        assert_ne!(first, second);
        fs::write(dir.path().join("notes.txt"), "not a snapshot").unwrap();

        let listed = manager.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(manager.latest().unwrap().unwrap().path, listed[0].path);
        assert!(listed[0].file_name >= listed[1].file_name);
    }

    #[tokio::test]
    async fn test_restore_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path());
        let store = MemoryScoreStore::new();

        let err = manager
            .restore(&store, &dir.path().join("funds_backup_19990101_000000.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SnapshotNotFound(_)));
    }

    #[tokio::test]
    async fn test_restore_corrupt_snapshot_leaves_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("funds_backup_20240101_000000.json");
        fs::write(&path, "{ not json").unwrap();

        let manager = SnapshotManager::new(dir.path());
        let store = MemoryScoreStore::new();
        store.upsert(&record("Alpha", 0.6, 0.4)).await.unwrap();

        let err = manager.restore(&store, &path).await.unwrap_err();
        assert!(matches!(err, StoreError::Snapshot(_)));
        assert_eq!(store.fetch_all().await.unwrap().len(), 1);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let manager = SnapshotManager::new("/nonexistent/backups/dir");
        assert!(manager.list().unwrap().is_empty());
    }
}
