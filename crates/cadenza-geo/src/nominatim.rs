//! Reverse geocoding against a Nominatim-compatible endpoint.

use std::{future::Future, time::Duration};

use cadenza_core::region::Address;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::{Error, Result};

/// Turns a coordinate into the address parts the region rule needs.
pub trait ReverseGeocoder: Send + Sync {
  fn reverse(
    &self,
    latitude: f64,
    longitude: f64,
  ) -> impl Future<Output = Result<Address>> + Send + '_;
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
  pub base_url:   String,
  /// Nominatim's usage policy requires an identifying agent.
  pub user_agent: String,
  pub timeout:    Duration,
}

impl Default for GeocoderConfig {
  fn default() -> Self {
    Self {
      base_url:   "https://nominatim.openstreetmap.org".into(),
      user_agent: concat!("cadenza-event-checker/", env!("CARGO_PKG_VERSION")).into(),
      timeout:    Duration::from_secs(10),
    }
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct NominatimClient {
  client:   Client,
  base_url: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
  /// Absent when the point resolves to nothing (open water, for instance).
  #[serde(default)]
  address: Option<Address>,
}

impl ReverseResponse {
  fn into_address(self) -> Address { self.address.unwrap_or_default() }
}

impl NominatimClient {
  pub fn new(config: GeocoderConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .user_agent(config.user_agent)
      .build()?;
    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_owned(),
    })
  }

  fn reverse_url(&self) -> String { format!("{}/reverse", self.base_url) }
}

impl ReverseGeocoder for NominatimClient {
  async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Address> {
    let url = self.reverse_url();
    info!(latitude, longitude, "calling reverse geocoder");

    let resp = self
      .client
      .get(&url)
      .query(&[
        ("format", "json".to_owned()),
        ("lat", latitude.to_string()),
        ("lon", longitude.to_string()),
      ])
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status { status, url });
    }

    let parsed: ReverseResponse = resp.json().await?;
    Ok(parsed.into_address())
  }
}
