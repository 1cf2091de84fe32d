//! The event record scrapers assemble and the core finalizes.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::tags::TagSet;

/// Length assumed for events whose listing gives no end time.
pub const DEFAULT_DURATION_MINUTES: i64 = 90;

// ─── Cost ────────────────────────────────────────────────────────────────────

/// A normalized cost: a bare number, or text such as `"25"` or `"40-80"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CostValue {
  Amount(f64),
  Text(String),
}

impl CostValue {
  /// Free means exactly zero: the number `0` or the literal text `"0"`.
  pub fn is_free(&self) -> bool {
    match self {
      CostValue::Amount(amount) => *amount == 0.0,
      CostValue::Text(text) => text == "0",
    }
  }
}

impl From<f64> for CostValue {
  fn from(amount: f64) -> Self { CostValue::Amount(amount) }
}

impl From<&str> for CostValue {
  fn from(text: &str) -> Self { CostValue::Text(text.to_owned()) }
}

impl From<String> for CostValue {
  fn from(text: String) -> Self { CostValue::Text(text) }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One event listing on its way from a scraper to the export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
  pub title:           String,
  /// Body text; may contain inline HTML.
  #[serde(default)]
  pub description:     String,
  /// Venue name exactly as scraped.
  #[serde(default)]
  pub venue_raw:       String,
  #[serde(default)]
  pub venue_canonical: Option<String>,
  /// Pricing text as scraped, e.g. "Tickets $25 / $15 students".
  #[serde(default)]
  pub cost_text:       Option<String>,
  #[serde(default)]
  pub cost_value:      Option<CostValue>,
  #[serde(default)]
  pub tags:            TagSet,
  /// `None` until relevance has been assessed.
  #[serde(default)]
  pub relevant:        Option<bool>,
  pub start_time:      NaiveDateTime,
  #[serde(default)]
  pub end_time:        Option<NaiveDateTime>,
  #[serde(default)]
  pub latitude:        Option<f64>,
  #[serde(default)]
  pub longitude:       Option<f64>,
  #[serde(default)]
  pub website:         Option<String>,
  #[serde(default)]
  pub organizer:       Option<String>,
}

impl EventRecord {
  /// An otherwise empty record.
  pub fn new(title: impl Into<String>, start_time: NaiveDateTime) -> Self {
    Self {
      title: title.into(),
      description: String::new(),
      venue_raw: String::new(),
      venue_canonical: None,
      cost_text: None,
      cost_value: None,
      tags: TagSet::new(),
      relevant: None,
      start_time,
      end_time: None,
      latitude: None,
      longitude: None,
      website: None,
      organizer: None,
    }
  }

  /// The listed end time, or [`DEFAULT_DURATION_MINUTES`] after the start.
  pub fn end_or_default(&self) -> NaiveDateTime {
    self
      .end_time
      .unwrap_or_else(|| self.start_time + Duration::minutes(DEFAULT_DURATION_MINUTES))
  }

  /// Whether the event starts on a calendar day before `date`.
  pub fn starts_before(&self, date: NaiveDate) -> bool { self.start_time.date() < date }

  /// Latitude and longitude, when the listing has both.
  pub fn coordinates(&self) -> Option<(f64, f64)> {
    self.latitude.zip(self.longitude)
  }

  /// The venue name to display: canonical if resolved, raw otherwise.
  pub fn venue(&self) -> &str {
    self.venue_canonical.as_deref().unwrap_or(&self.venue_raw)
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 3, 14)
      .unwrap()
      .and_hms_opt(h, m, 0)
      .unwrap()
  }

  #[test]
  fn free_is_exactly_zero() {
    assert!(CostValue::Amount(0.0).is_free());
    assert!(CostValue::from("0").is_free());
    assert!(!CostValue::from("0-20").is_free());
    assert!(!CostValue::from("").is_free());
    assert!(!CostValue::Amount(10.0).is_free());
  }

  #[test]
  fn end_defaults_to_ninety_minutes() {
    let mut r = EventRecord::new("Recital", at(19, 30));
    assert_eq!(r.end_or_default(), at(21, 0));
    r.end_time = Some(at(22, 15));
    assert_eq!(r.end_or_default(), at(22, 15));
  }

  #[test]
  fn deserializes_sparse_scraper_output() {
    let json = r#"{
      "title": "Organ Vespers",
      "start_time": "2030-03-14T19:30:00",
      "cost_value": 0,
      "tags": ["EB"],
      "latitude": 40.7,
      "longitude": -74.0
    }"#;
    let r: EventRecord = serde_json::from_str(json).unwrap();
    assert_eq!(r.title, "Organ Vespers");
    assert_eq!(r.cost_value, Some(CostValue::Amount(0.0)));
    assert!(r.tags.contains("EB"));
    assert_eq!(r.coordinates(), Some((40.7, -74.0)));
    assert_eq!(r.relevant, None);
  }

  #[test]
  fn cost_value_accepts_text() {
    let json = r#"{"title": "x", "start_time": "2030-03-14T19:30:00", "cost_value": "25-40"}"#;
    let r: EventRecord = serde_json::from_str(json).unwrap();
    assert_eq!(r.cost_value, Some(CostValue::Text("25-40".into())));
  }

  #[test]
  fn venue_prefers_canonical() {
    let mut r = EventRecord::new("x", at(12, 0));
    r.venue_raw = "Merkin Hall".into();
    assert_eq!(r.venue(), "Merkin Hall");
    r.venue_canonical = Some("Merkin Concert Hall at Kaufman Music Center".into());
    assert_eq!(r.venue(), "Merkin Concert Hall at Kaufman Music Center");
  }
}
