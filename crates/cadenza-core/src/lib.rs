//! Core types and decision rules for the Cadenza event feed.
//!
//! This crate has no HTTP or database dependencies.
//! Scrapers hand it loosely-typed event records; it classifies, tags and
//! normalizes them. Persistence and geocoding live behind traits implemented
//! by sibling crates.

// Native `async fn` in traits; the trait declarations spell out `Send`.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod filter;
pub mod keywords;
pub mod location;
pub mod matcher;
pub mod price;
pub mod record;
pub mod region;
pub mod relevance;
pub mod tags;
pub mod venue;

pub use error::{Error, Result};
pub use filter::accept_record;
pub use price::parse_price_range;
pub use relevance::{assess_relevance, is_adjacent_relevant, is_core_relevant};
pub use tags::{Tag, TagSet, finalize_tags, infer_tags};
pub use venue::{CanonicalVenue, canonicalize_venue};
