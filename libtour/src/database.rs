use crate::error::Result;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;
use tracing::trace;

/// Handle to the sqlite file holding per-user state: accounts, favorites and
/// travel logs. Everything about the map itself lives in the feed, not here.
#[derive(Clone, Debug)]
pub struct Database(Pool<Sqlite>);

impl Database {
    /// Open the database at the given path, applying any pending schema
    /// migrations before handing the pool out.
    pub async fn open<P: AsRef<Path>>(db: P) -> Result<Self> {
        let dbpool =
            SqlitePool::connect(&format!("sqlite://{}", db.as_ref().to_string_lossy())).await?;
        trace!("Running database migrations");
        sqlx::migrate!("../db/migrations").run(&dbpool).await?;
        Ok(Database(dbpool))
    }

    /// The underlying pool, for callers that need it directly (session
    /// storage, tests).
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.0
    }
}

impl From<Pool<Sqlite>> for Database {
    fn from(pool: Pool<Sqlite>) -> Self {
        Self(pool)
    }
}
