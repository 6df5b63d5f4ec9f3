//! Account store connection management.
//!
//! Same open/pragma/migrate shape as the cache connection, against a
//! separate database file so a broken cache never takes the dataset down
//! with it.

use crate::{Error, migrations};
use std::path::Path;
use tokio_rusqlite::Connection;

const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/store_001_accounts.sql"))];

/// Account store handle.
#[derive(Clone, Debug)]
pub struct StoreDb {
    pub(crate) conn: Connection,
}

impl StoreDb {
    /// Open the account database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        configure(&conn).await?;
        Ok(Self { conn })
    }

    /// Open an in-memory account database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        configure(&conn).await?;
        Ok(Self { conn })
    }

    /// Connectivity probe for the health endpoint.
    pub async fn ping(&self) -> Result<(), Error> {
        self.conn
            .call(|conn| -> Result<(), Error> {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

async fn configure(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA temp_store=MEMORY;
             PRAGMA foreign_keys=ON;",
        )?;
        Ok(())
    })
    .await
    .map_err(Error::Database)?;

    migrations::run(conn, MIGRATIONS).await
}
