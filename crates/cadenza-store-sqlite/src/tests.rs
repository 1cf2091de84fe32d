//! Integration tests for `SqliteLocationStore` against an in-memory database.

use cadenza_core::location::{CoordKey, LocationEntry, LocationStore};

use crate::SqliteLocationStore;

async fn store() -> SqliteLocationStore {
  SqliteLocationStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn entry(lat: f64, lon: f64, venue: Option<&str>, in_region: bool) -> LocationEntry {
  LocationEntry {
    key: CoordKey::quantize(lat, lon),
    venue: venue.map(str::to_owned),
    in_region,
  }
}

// ─── Lookup / insert ─────────────────────────────────────────────────────────

#[tokio::test]
async fn lookup_missing_returns_none() {
  let s = store().await;
  let result = s.lookup(CoordKey::quantize(40.7, -74.0)).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn insert_and_lookup() {
  let s = store().await;
  let e = entry(40.712776, -74.005974, Some("Test Venue"), true);
  s.insert(e.clone()).await.unwrap();

  let fetched = s.lookup(e.key).await.unwrap().unwrap();
  assert_eq!(fetched, e);
}

#[tokio::test]
async fn false_is_stored_as_false() {
  let s = store().await;
  let e = entry(40.5795, -74.1502, None, false);
  s.insert(e.clone()).await.unwrap();

  let fetched = s.lookup(e.key).await.unwrap().unwrap();
  assert!(!fetched.in_region);
  assert!(fetched.venue.is_none());
}

#[tokio::test]
async fn lookup_is_exact_on_fixed_point_key() {
  let s = store().await;
  s.insert(entry(40.712776, -74.005974, None, true)).await.unwrap();

  // Same key after truncation.
  assert!(s.lookup(CoordKey::quantize(40.7127769, -74.0059749)).await.unwrap().is_some());
  // Neighbouring key.
  let neighbour = CoordKey { latitude: 4_071_278, longitude: -7_400_597 };
  assert!(s.lookup(neighbour).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_insert_keeps_first() {
  let s = store().await;
  let first = entry(40.7, -74.0, Some("First"), true);
  s.insert(first.clone()).await.unwrap();
  s.insert(entry(40.7, -74.0, Some("Second"), false)).await.unwrap();

  assert_eq!(s.lookup(first.key).await.unwrap().unwrap(), first);
  assert_eq!(s.count().await.unwrap(), 1);
}

// ─── Update / delete ─────────────────────────────────────────────────────────

#[tokio::test]
async fn update_venue_backfills() {
  let s = store().await;
  let e = entry(40.7, -74.0, None, true);
  s.insert(e.clone()).await.unwrap();

  s.update_venue(e.key, "Klavierhaus".into()).await.unwrap();

  let fetched = s.lookup(e.key).await.unwrap().unwrap();
  assert_eq!(fetched.venue.as_deref(), Some("Klavierhaus"));
  assert!(fetched.in_region);
}

#[tokio::test]
async fn update_venue_on_missing_key_is_a_no_op() {
  let s = store().await;
  s.update_venue(CoordKey::quantize(1.0, 2.0), "Nowhere".into())
    .await
    .unwrap();
  assert_eq!(s.count().await.unwrap(), 0);
}

#[tokio::test]
async fn delete_removes_entry() {
  let s = store().await;
  let e = entry(40.7, -74.0, None, true);
  s.insert(e.clone()).await.unwrap();

  assert!(s.delete(e.key).await.unwrap());
  assert!(s.lookup(e.key).await.unwrap().is_none());
  assert!(!s.delete(e.key).await.unwrap());
}

#[tokio::test]
async fn reopening_a_file_keeps_entries() {
  let path = std::env::temp_dir().join(format!(
    "cadenza-store-test-{}.sqlite",
    std::process::id()
  ));
  let _ = std::fs::remove_file(&path);

  let e = entry(40.7, -74.0, Some("Hall"), true);
  {
    let s = SqliteLocationStore::open(&path).await.unwrap();
    s.insert(e.clone()).await.unwrap();
  }
  let s = SqliteLocationStore::open(&path).await.unwrap();
  assert_eq!(s.lookup(e.key).await.unwrap(), Some(e));

  drop(s);
  let _ = std::fs::remove_file(&path);
}
