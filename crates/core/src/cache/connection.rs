//! Cache database connection management.
//!
//! Opens the cache SQLite file, applies pragmas for performance and
//! concurrency (WAL mode), and runs the cache-side migrations.

use crate::{Error, migrations};
use std::path::Path;
use tokio_rusqlite::Connection;

const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/cache_001_entries.sql"))];

/// Cache database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread.
#[derive(Clone, Debug)]
pub struct CacheDb {
    pub(crate) conn: Connection,
}

impl CacheDb {
    /// Open the cache database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        configure(&conn).await?;
        Ok(Self { conn })
    }

    /// Open an in-memory cache database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        configure(&conn).await?;
        Ok(Self { conn })
    }
}

async fn configure(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA temp_store=MEMORY;",
        )?;
        Ok(())
    })
    .await
    .map_err(Error::Database)?;

    migrations::run(conn, MIGRATIONS).await
}
