//! The record pipeline: venue, price, tags, relevance, region, acceptance.

use cadenza_core::{
  CanonicalVenue, accept_record, canonicalize_venue,
  keywords::KeywordTables,
  location::LocationStore,
  parse_price_range,
  record::{CostValue, EventRecord},
  relevance::RelevanceClassifier,
  tags::TagInferer,
  venue::{AliasTable, VenueRegistry},
};
use cadenza_geo::{Clock, RegionCache, ReverseGeocoder};
use chrono::NaiveDate;
use tracing::info;

pub struct Pipeline<S, G, C> {
  aliases:          AliasTable,
  classifier:       RelevanceClassifier,
  tagger:           TagInferer,
  registry:         VenueRegistry,
  extra_tags:       Vec<String>,
  include_adjacent: bool,
  region:           RegionCache<S, G, C>,
}

/// Everything the pipeline needs besides the region cache.
pub struct PipelineConfig {
  pub keywords:         KeywordTables,
  pub aliases:          AliasTable,
  pub registry:         VenueRegistry,
  pub extra_tags:       Vec<String>,
  pub include_adjacent: bool,
}

impl<S, G, C> Pipeline<S, G, C>
where
  S: LocationStore,
  G: ReverseGeocoder,
  C: Clock,
{
  pub fn new(config: PipelineConfig, region: RegionCache<S, G, C>) -> cadenza_core::Result<Self> {
    Ok(Self {
      classifier: RelevanceClassifier::from_tables(&config.keywords)?,
      tagger: TagInferer::from_tables(&config.keywords)?,
      aliases: config.aliases,
      registry: config.registry,
      extra_tags: config.extra_tags,
      include_adjacent: config.include_adjacent,
      region,
    })
  }

  /// Run every record through the pipeline. Survivors come back ordered by
  /// start time.
  pub async fn process(&self, records: Vec<EventRecord>, today: NaiveDate) -> Vec<EventRecord> {
    let total = records.len();
    let mut accepted = Vec::with_capacity(total);
    for record in records {
      if let Some(record) = self.process_one(record, today).await {
        accepted.push(record);
      }
    }
    accepted.sort_by_key(|r| r.start_time);
    info!(total, accepted = accepted.len(), "processed records");
    accepted
  }

  pub async fn process_one(&self, mut record: EventRecord, today: NaiveDate) -> Option<EventRecord> {
    if !record.venue_raw.trim().is_empty() {
      match canonicalize_venue(&record.venue_raw, &self.aliases) {
        CanonicalVenue::Skip => {
          info!(title = %record.title, venue = %record.venue_raw, "skipping event at excluded venue");
          return None;
        }
        CanonicalVenue::Name(name) => record.venue_canonical = Some(name),
      }
    }

    if record.cost_value.is_none()
      && let Some(text) = &record.cost_text
    {
      let price = parse_price_range(text);
      if !price.is_empty() {
        record.cost_value = Some(CostValue::Text(price));
      }
    }

    self.tagger.finalize(&mut record, &self.extra_tags);

    if !self.classifier.assess(&mut record, today, self.include_adjacent) {
      info!(title = %record.title, "skipping irrelevant event");
      return None;
    }

    if let Some((latitude, longitude)) = record.coordinates() {
      let venue = Some(record.venue()).filter(|v| !v.is_empty());
      if !self.region.is_in_region(latitude, longitude, venue).await {
        info!(title = %record.title, venue = record.venue(), "skipping event outside region");
        return None;
      }
    }

    if self.registry.needs_registration(record.venue()) {
      info!(venue = record.venue(), "need to create venue");
    }

    accept_record(record, today)
  }
}
