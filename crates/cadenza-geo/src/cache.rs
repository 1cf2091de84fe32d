//! [`RegionCache`]: cached answers to "is this point inside the region?".

use cadenza_core::{
  location::{CoordKey, LocationEntry, LocationStore},
  region::RegionRule,
};
use tracing::{debug, info, warn};

use crate::{
  clock::{Clock, SystemClock},
  gate::RateGate,
  nominatim::ReverseGeocoder,
};

/// Looks coordinates up in a [`LocationStore`] and resolves misses through a
/// rate-gated [`ReverseGeocoder`].
///
/// Store failures are logged and bypassed; geocoder failures answer `false`
/// and cache nothing, so the point is retried next time.
pub struct RegionCache<S, G, C = SystemClock> {
  store:    S,
  geocoder: G,
  gate:     RateGate<C>,
  rule:     RegionRule,
}

impl<S, G, C> RegionCache<S, G, C>
where
  S: LocationStore,
  G: ReverseGeocoder,
  C: Clock,
{
  pub fn new(store: S, geocoder: G, gate: RateGate<C>, rule: RegionRule) -> Self {
    Self { store, geocoder, gate, rule }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn rule(&self) -> &RegionRule { &self.rule }

  pub async fn is_in_region(&self, latitude: f64, longitude: f64, venue: Option<&str>) -> bool {
    let key = CoordKey::quantize(latitude, longitude);
    let venue = venue.map(str::trim).filter(|v| !v.is_empty());

    match self.store.lookup(key).await {
      Ok(Some(entry)) => {
        debug!(?key, in_region = entry.in_region, "location cache hit");
        if entry.venue.is_none()
          && let Some(venue) = venue
        {
          self.backfill_venue(key, venue).await;
        }
        return entry.in_region;
      }
      Ok(None) => {}
      Err(e) => warn!(?key, error = %e, "location cache lookup failed; resolving directly"),
    }

    info!(venue = venue.unwrap_or_default(), latitude, longitude, "looking up location");
    let address = match self
      .gate
      .run(|| self.geocoder.reverse(latitude, longitude))
      .await
    {
      Ok(address) => address,
      Err(e) => {
        info!(latitude, longitude, error = %e, "reverse geocoding failed");
        return false;
      }
    };

    let in_region = self.rule.contains(&address);
    let entry = LocationEntry { key, venue: venue.map(str::to_owned), in_region };
    if let Err(e) = self.store.insert(entry).await {
      warn!(?key, error = %e, "failed to cache location");
    }
    in_region
  }

  /// Drop the cached answer for a point so the next query re-resolves it.
  pub async fn forget(&self, latitude: f64, longitude: f64) -> Result<bool, S::Error> {
    self.store.delete(CoordKey::quantize(latitude, longitude)).await
  }

  async fn backfill_venue(&self, key: CoordKey, venue: &str) {
    match self.store.update_venue(key, venue.to_owned()).await {
      Ok(()) => debug!(?key, venue, "backfilled cached venue"),
      Err(e) => warn!(?key, error = %e, "failed to backfill cached venue"),
    }
  }
}
