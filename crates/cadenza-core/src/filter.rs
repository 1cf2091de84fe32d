//! The acceptance filter, the last check before a record is exported.

use chrono::NaiveDate;
use tracing::info;

use crate::{record::EventRecord, relevance::assess_relevance};

/// Accept or discard a finished record.
///
/// Records not yet assessed are classified against the core keywords first.
/// Irrelevant records and those starting before `cutoff` are dropped;
/// accepted ones get their title and description tidied.
pub fn accept_record(mut record: EventRecord, cutoff: NaiveDate) -> Option<EventRecord> {
  let relevant = match record.relevant {
    Some(relevant) => relevant,
    None => assess_relevance(&mut record, cutoff, false),
  };
  if !relevant {
    info!(title = %record.title, "skipping irrelevant event");
    return None;
  }

  if record.starts_before(cutoff) {
    info!(title = %record.title, date = %record.start_time.date(), "skipping past event");
    return None;
  }

  if record.title.contains("<b>") || record.title.contains("</b>") {
    record.title = record.title.replace("<b>", "").replace("</b>", "");
  }
  if record.title.contains("&amp;") {
    record.title = record.title.replace("&amp;", "&");
  }
  record.description = record
    .description
    .replace("Join us", "Join")
    .replace("join us", "join");

  Some(record)
}
