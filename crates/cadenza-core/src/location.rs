//! The location cache: remembers whether a coordinate lies in the feed's
//! region so each venue is geocoded once.
//!
//! The [`LocationStore`] trait is implemented by storage backends (e.g.
//! `cadenza-store-sqlite`). [`MemoryLocationStore`] keeps entries in process
//! and is used when no database is configured.

use std::{
  collections::HashMap,
  convert::Infallible,
  future::Future,
  sync::{Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};

/// Coordinates are stored as integers scaled by this factor.
pub const FIX_POINT_FACTOR: f64 = 100_000.0;

// ─── Keys and entries ────────────────────────────────────────────────────────

/// A latitude/longitude pair in fixed-point form, suitable for exact
/// equality lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordKey {
  pub latitude:  i64,
  pub longitude: i64,
}

impl CoordKey {
  /// Scale by [`FIX_POINT_FACTOR`] and truncate toward zero.
  pub fn quantize(latitude: f64, longitude: f64) -> Self {
    Self {
      latitude:  (latitude * FIX_POINT_FACTOR) as i64,
      longitude: (longitude * FIX_POINT_FACTOR) as i64,
    }
  }
}

/// One cached region decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
  pub key:       CoordKey,
  /// Venue name attached when the entry was created or backfilled later.
  pub venue:     Option<String>,
  pub in_region: bool,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a location cache backend.
///
/// The coordinate pair is unique. Inserting a key that already exists leaves
/// the existing entry unchanged.
pub trait LocationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the entry for `key`. Returns `None` if not cached.
  fn lookup(
    &self,
    key: CoordKey,
  ) -> impl Future<Output = Result<Option<LocationEntry>, Self::Error>> + Send + '_;

  /// Persist a new entry.
  fn insert(
    &self,
    entry: LocationEntry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Attach a venue name to an existing entry.
  fn update_venue(
    &self,
    key: CoordKey,
    venue: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove a stale entry. Returns whether anything was removed.
  fn delete(&self, key: CoordKey) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// A process-local [`LocationStore`]. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryLocationStore {
  entries: Mutex<HashMap<CoordKey, LocationEntry>>,
}

impl MemoryLocationStore {
  pub fn new() -> Self { Self::default() }

  pub fn len(&self) -> usize { self.entries().len() }

  pub fn is_empty(&self) -> bool { self.entries().is_empty() }

  fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<CoordKey, LocationEntry>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl LocationStore for MemoryLocationStore {
  type Error = Infallible;

  async fn lookup(&self, key: CoordKey) -> Result<Option<LocationEntry>, Infallible> {
    Ok(self.entries().get(&key).cloned())
  }

  async fn insert(&self, entry: LocationEntry) -> Result<(), Infallible> {
    self.entries().entry(entry.key).or_insert(entry);
    Ok(())
  }

  async fn update_venue(&self, key: CoordKey, venue: String) -> Result<(), Infallible> {
    if let Some(entry) = self.entries().get_mut(&key) {
      entry.venue = Some(venue);
    }
    Ok(())
  }

  async fn delete(&self, key: CoordKey) -> Result<bool, Infallible> {
    Ok(self.entries().remove(&key).is_some())
  }
}
