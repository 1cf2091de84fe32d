//! Relevance classification: does an event concern the site's instruments?

use std::sync::LazyLock;

use chrono::NaiveDate;
use tracing::info;

use crate::{
  Result,
  keywords::KeywordTables,
  matcher::{Haystack, WordMatcher},
  record::EventRecord,
};

static BUILTIN: LazyLock<RelevanceClassifier> = LazyLock::new(|| {
  RelevanceClassifier::from_tables(KeywordTables::builtin())
    .expect("built-in relevance keywords compile")
});

/// Two whole-word predicates over the relevance keyword lists.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
  core:     WordMatcher,
  adjacent: WordMatcher,
}

impl RelevanceClassifier {
  pub fn from_tables(tables: &KeywordTables) -> Result<Self> {
    Ok(Self {
      core:     WordMatcher::new("relevance.core", &tables.relevance.core)?,
      adjacent: WordMatcher::new("relevance.adjacent", &tables.relevance.adjacent)?,
    })
  }

  /// The classifier built from the embedded keyword tables.
  pub fn builtin() -> &'static RelevanceClassifier { &BUILTIN }

  /// Whether any text names one of the core instruments.
  pub fn is_core_relevant<H: Haystack + ?Sized>(&self, haystack: &H) -> bool {
    self.core.matches_any(haystack)
  }

  /// Whether any text names an instrument or voice the core instruments
  /// usually accompany.
  pub fn is_adjacent_relevant<H: Haystack + ?Sized>(&self, haystack: &H) -> bool {
    self.adjacent.matches_any(haystack)
  }

  /// Decide and record whether `record` belongs in the feed.
  ///
  /// Events starting before `today` are never relevant. Otherwise the
  /// description, title and website are scanned for core keywords, and for
  /// adjacent keywords as well when `include_adjacent` is set.
  pub fn assess(
    &self,
    record: &mut EventRecord,
    today: NaiveDate,
    include_adjacent: bool,
  ) -> bool {
    if record.starts_before(today) {
      info!(
        date = %record.start_time.date(),
        title = %record.title,
        "skipping past event"
      );
      record.relevant = Some(false);
      return false;
    }

    let haystack = [
      record.description.as_str(),
      record.title.as_str(),
      record.website.as_deref().unwrap_or_default(),
    ];
    let relevant = self.is_core_relevant(&haystack)
      || (include_adjacent && self.is_adjacent_relevant(&haystack));

    record.relevant = Some(relevant);
    relevant
  }
}

/// [`RelevanceClassifier::is_core_relevant`] with the built-in keywords.
pub fn is_core_relevant<H: Haystack + ?Sized>(haystack: &H) -> bool {
  RelevanceClassifier::builtin().is_core_relevant(haystack)
}

/// [`RelevanceClassifier::is_adjacent_relevant`] with the built-in keywords.
pub fn is_adjacent_relevant<H: Haystack + ?Sized>(haystack: &H) -> bool {
  RelevanceClassifier::builtin().is_adjacent_relevant(haystack)
}

/// [`RelevanceClassifier::assess`] with the built-in keywords.
pub fn assess_relevance(
  record: &mut EventRecord,
  today: NaiveDate,
  include_adjacent: bool,
) -> bool {
  RelevanceClassifier::builtin().assess(record, today, include_adjacent)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn record(title: &str, description: &str, on: NaiveDate) -> EventRecord {
    let mut r = EventRecord::new(title, on.and_hms_opt(19, 30, 0).unwrap());
    r.description = description.into();
    r
  }

  #[test]
  fn core_keywords_are_whole_words() {
    assert!(!is_core_relevant("organized"));
    assert!(is_core_relevant("pipe organ recital"));
    assert!(is_core_relevant("An evening with PIANIST Jane Doe"));
    assert!(is_core_relevant("Yuja plays Rachmaninoff"));
    assert!(!is_core_relevant("pianoforte society mixer"));
  }

  #[test]
  fn empty_haystack_is_not_relevant() {
    assert!(!is_core_relevant(""));
    assert!(!is_adjacent_relevant(""));
    assert!(!is_core_relevant(&Vec::<String>::new()));
  }

  #[test]
  fn sequences_and_strings_are_interchangeable() {
    let texts = ["Songs of the sea", "with harpsichord continuo"];
    assert!(is_core_relevant(&texts));
    assert!(is_core_relevant(&texts.join(" ")));
    assert!(!is_core_relevant(&texts[..1]));
  }

  #[test]
  fn adjacent_keywords_include_phrases() {
    assert!(is_adjacent_relevant("Winter Songbook concert"));
    assert!(is_adjacent_relevant("music for English horn and strings"));
    assert!(is_adjacent_relevant("Violin sonatas"));
    assert!(!is_adjacent_relevant("violinist meet and greet"));
    assert!(!is_adjacent_relevant("pianist recital"));
  }

  #[test]
  fn assess_marks_past_events_irrelevant() {
    let mut r = record("Piano recital", "", date(2024, 1, 1));
    assert!(!assess_relevance(&mut r, date(2024, 1, 2), true));
    assert_eq!(r.relevant, Some(false));
  }

  #[test]
  fn assess_today_is_not_past() {
    let mut r = record("Piano recital", "", date(2024, 1, 2));
    assert!(assess_relevance(&mut r, date(2024, 1, 2), false));
    assert_eq!(r.relevant, Some(true));
  }

  #[test]
  fn assess_uses_adjacent_only_when_asked() {
    let mut r = record("Cello sonatas", "An afternoon of Brahms.", date(2030, 5, 1));
    assert!(!assess_relevance(&mut r, date(2030, 1, 1), false));
    assert_eq!(r.relevant, Some(false));
    assert!(assess_relevance(&mut r, date(2030, 1, 1), true));
    assert_eq!(r.relevant, Some(true));
  }

  #[test]
  fn assess_scans_website() {
    let mut r = record("Sunday matinee", "", date(2030, 5, 1));
    r.website = Some("https://example.org/events/organ-festival".into());
    assert!(assess_relevance(&mut r, date(2030, 1, 1), false));
  }
}
