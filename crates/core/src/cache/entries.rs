//! Cache entry operations.
//!
//! A single `entries` table: key, JSON value, creation and expiry timestamps.
//! Lifecycle per key: absent -> present (on put) -> absent again on TTL
//! elapse or explicit purge. Last writer wins.

use super::connection::CacheDb;
use crate::Error;
use crate::filter::escape_like;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Aggregate cache state for the monitor endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub expired: u64,
    pub oldest_created_at: Option<String>,
    pub newest_created_at: Option<String>,
}

impl CacheDb {
    /// Get an unexpired cached value by key.
    ///
    /// Expired entries are treated as absent; they are removed lazily by
    /// [`CacheDb::purge_expired`], not on read.
    pub async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let key = key.to_string();
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt = conn.prepare("SELECT value FROM entries WHERE key = ?1 AND expires_at > ?2")?;

                let result = stmt.query_row(params![key, now], |row| row.get(0));

                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a cached value with a time-to-live.
    ///
    /// Uses UPSERT semantics: inserts if the key doesn't exist, replaces
    /// value and timestamps if it does.
    pub async fn put(&self, key: &str, value: &str, ttl_seconds: i64) -> Result<(), Error> {
        let key = key.to_string();
        let value = value.to_string();

        let created_at = Utc::now().to_rfc3339();
        let expires_at = (Utc::now() + Duration::seconds(ttl_seconds)).to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (key, value, created_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        created_at = excluded.created_at,
                        expires_at = excluded.expires_at",
                    params![key, value, created_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete all entries whose key starts with `prefix` (manual flush).
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_prefix(&self, prefix: &str) -> Result<u64, Error> {
        let pattern = format!("{}%", escape_like(prefix));
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM entries WHERE key LIKE ?1 ESCAPE '\\'", params![pattern])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM entries WHERE expires_at < ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Aggregate counts and creation-time bounds for the cache monitor.
    pub async fn stats(&self) -> Result<CacheStats, Error> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<CacheStats, Error> {
                let (entries, expired, oldest, newest) = conn.query_row(
                    "SELECT
                        COUNT(*),
                        COUNT(*) FILTER (WHERE expires_at < ?1),
                        MIN(created_at),
                        MAX(created_at)
                    FROM entries",
                    params![now],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, Option<String>>(2)?,
                            row.get::<_, Option<String>>(3)?,
                        ))
                    },
                )?;
                Ok(CacheStats {
                    entries: entries as u64,
                    expired: expired as u64,
                    oldest_created_at: oldest,
                    newest_created_at: newest,
                })
            })
            .await
            .map_err(Error::from)
    }
}
