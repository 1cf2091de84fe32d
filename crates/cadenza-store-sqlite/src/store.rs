//! [`SqliteLocationStore`], the SQLite implementation of [`LocationStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tracing::debug;

use cadenza_core::location::{CoordKey, LocationEntry, LocationStore};

use crate::{Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A location cache backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteLocationStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteLocationStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of cached coordinates.
  pub async fn count(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM location_cache", [], |r| r.get(0))?)
      })
      .await?;
    Ok(usize::try_from(count).unwrap_or_default())
  }
}

// ─── LocationStore impl ──────────────────────────────────────────────────────

impl LocationStore for SqliteLocationStore {
  type Error = crate::Error;

  async fn lookup(&self, key: CoordKey) -> Result<Option<LocationEntry>> {
    let row: Option<(Option<String>, bool)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT venue, is_in_region FROM location_cache
             WHERE latitude = ?1 AND longitude = ?2",
            rusqlite::params![key.latitude, key.longitude],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?)
      })
      .await?;

    Ok(row.map(|(venue, in_region)| LocationEntry { key, venue, in_region }))
  }

  async fn insert(&self, entry: LocationEntry) -> Result<()> {
    let LocationEntry { key, venue, in_region } = entry;
    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO location_cache (latitude, longitude, venue, is_in_region)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![key.latitude, key.longitude, venue, in_region],
        )?)
      })
      .await?;
    if inserted == 0 {
      debug!(?key, "location already cached; insert ignored");
    }
    Ok(())
  }

  async fn update_venue(&self, key: CoordKey, venue: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE location_cache SET venue = ?3 WHERE latitude = ?1 AND longitude = ?2",
          rusqlite::params![key.latitude, key.longitude, venue],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete(&self, key: CoordKey) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM location_cache WHERE latitude = ?1 AND longitude = ?2",
          rusqlite::params![key.latitude, key.longitude],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }
}
