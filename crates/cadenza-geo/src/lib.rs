//! Reverse geocoding and the region cache for Cadenza.
//!
//! [`RegionCache`] answers "is this coordinate inside the feed's region?",
//! consulting a [`LocationStore`](cadenza_core::location::LocationStore)
//! first and falling back to a rate-limited [`ReverseGeocoder`].

#![allow(async_fn_in_trait)]

pub mod cache;
pub mod clock;
pub mod error;
pub mod gate;
pub mod nominatim;

pub use cache::RegionCache;
pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use gate::RateGate;
pub use nominatim::{GeocoderConfig, NominatimClient, ReverseGeocoder};
