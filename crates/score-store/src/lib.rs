pub mod db;
pub mod memory;
pub mod snapshot;
pub mod sqlite;

pub use db::ScoreDb;
pub use memory::MemoryScoreStore;
pub use snapshot::{Snapshot, SnapshotInfo, SnapshotManager};
pub use sqlite::SqliteScoreStore;
