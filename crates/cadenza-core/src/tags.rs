//! Tag inference: derives the categorical tags of an event from its text.
//!
//! The rules run in a fixed order and later rules may add or remove tags set
//! by earlier ones, so the sequence in [`TagInferer::infer`] is part of the
//! contract. The trigger words come from [`KeywordTables`].

use std::{collections::BTreeSet, fmt, sync::LazyLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use crate::{
  Result,
  keywords::KeywordTables,
  matcher::WordMatcher,
  record::{CostValue, EventRecord},
  relevance::RelevanceClassifier,
};

static BUILTIN: LazyLock<TagInferer> = LazyLock::new(|| {
  TagInferer::from_tables(KeywordTables::builtin()).expect("built-in tag keywords compile")
});

// ─── Tag names ───────────────────────────────────────────────────────────────

/// Tags the inference rules know about.
///
/// Scrapers may attach other tags too (e.g. a source marker); those pass
/// through inference untouched.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, IntoStaticStr,
)]
pub enum Tag {
  #[strum(serialize = "Chamber Music")]
  ChamberMusic,
  Classical,
  Collaborative,
  Competition,
  Debut,
  Ensemble,
  Fortepiano,
  #[strum(serialize = "Four Hand")]
  FourHand,
  Free,
  Harpsichord,
  Jazz,
  #[strum(serialize = "Master Class")]
  MasterClass,
  Opera,
  Orchestra,
  Organ,
  Premiere,
  Rehearsal,
  Solo,
  Vocal,
  #[strum(serialize = "Young Audience")]
  YoungAudience,
  #[strum(serialize = "Young Performer")]
  YoungPerformer,
}

// ─── TagSet ──────────────────────────────────────────────────────────────────

/// A deduplicated set of tag names.
///
/// Renders (and serializes) as a comma-joined list sorted
/// case-insensitively. Deserializes from either that string or a JSON list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
  tags: BTreeSet<String>,
}

impl TagSet {
  pub fn new() -> Self { Self::default() }

  /// Add a tag; blank names are ignored. Returns whether it was new.
  pub fn insert(&mut self, tag: impl Into<String>) -> bool {
    let tag = tag.into();
    let tag = tag.trim();
    if tag.is_empty() {
      return false;
    }
    self.tags.insert(tag.to_owned())
  }

  pub fn insert_tag(&mut self, tag: Tag) -> bool { self.insert(tag.as_ref()) }

  pub fn remove(&mut self, tag: &str) -> bool { self.tags.remove(tag) }

  pub fn remove_tag(&mut self, tag: Tag) -> bool { self.remove(tag.as_ref()) }

  /// Exact, case-sensitive membership.
  pub fn contains(&self, tag: &str) -> bool { self.tags.contains(tag) }

  pub fn contains_tag(&self, tag: Tag) -> bool { self.contains(tag.as_ref()) }

  pub fn len(&self) -> usize { self.tags.len() }

  pub fn is_empty(&self) -> bool { self.tags.is_empty() }

  /// Tag names sorted case-insensitively; ties keep byte order.
  pub fn sorted(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.tags.iter().map(String::as_str).collect();
    names.sort_by_cached_key(|name| name.to_lowercase());
    names
  }

  /// The comma-joined export form.
  pub fn joined(&self) -> String { self.sorted().join(",") }

  /// Parse the comma-joined export form.
  pub fn parse(joined: &str) -> Self { joined.split(',').collect() }
}

impl fmt::Display for TagSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.joined()) }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut set = TagSet::new();
    set.extend(iter);
    set
  }
}

impl<S: Into<String>> Extend<S> for TagSet {
  fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
    for tag in iter {
      self.insert(tag);
    }
  }
}

impl Serialize for TagSet {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.joined())
  }
}

impl<'de> Deserialize<'de> for TagSet {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
      Joined(String),
      List(Vec<String>),
    }

    Ok(match Repr::deserialize(deserializer)? {
      Repr::Joined(joined) => TagSet::parse(&joined),
      Repr::List(list) => list.into_iter().collect(),
    })
  }
}

// ─── Inference ───────────────────────────────────────────────────────────────

/// Compiled trigger lists, one per keyword-driven rule.
#[derive(Debug, Clone)]
struct TagMatchers {
  rehearsal:       WordMatcher,
  master_class:    WordMatcher,
  vocal:           WordMatcher,
  opera:           WordMatcher,
  premiere:        WordMatcher,
  debut:           WordMatcher,
  orchestra:       WordMatcher,
  organ:           WordMatcher,
  fortepiano:      WordMatcher,
  harpsichord:     WordMatcher,
  competition:     WordMatcher,
  four_hand:       WordMatcher,
  young_performer: WordMatcher,
  jazz:            WordMatcher,
  young_audience:  WordMatcher,
}

/// Tags whose presence makes an event classical.
const CLASSICAL_MARKERS: [Tag; 5] = [
  Tag::Orchestra,
  Tag::Opera,
  Tag::Fortepiano,
  Tag::Harpsichord,
  Tag::ChamberMusic,
];

/// The heuristic tagging engine.
#[derive(Debug, Clone)]
pub struct TagInferer {
  matchers:  TagMatchers,
  relevance: RelevanceClassifier,
}

impl TagInferer {
  pub fn from_tables(tables: &KeywordTables) -> Result<Self> {
    let t = &tables.tags;
    Ok(Self {
      matchers:  TagMatchers {
        rehearsal:       WordMatcher::new("tags.rehearsal", &t.rehearsal)?,
        master_class:    WordMatcher::new("tags.master_class", &t.master_class)?,
        vocal:           WordMatcher::new("tags.vocal", &t.vocal)?,
        opera:           WordMatcher::new("tags.opera", &t.opera)?,
        premiere:        WordMatcher::new("tags.premiere", &t.premiere)?,
        debut:           WordMatcher::new("tags.debut", &t.debut)?,
        orchestra:       WordMatcher::new("tags.orchestra", &t.orchestra)?,
        organ:           WordMatcher::new("tags.organ", &t.organ)?,
        fortepiano:      WordMatcher::new("tags.fortepiano", &t.fortepiano)?,
        harpsichord:     WordMatcher::new("tags.harpsichord", &t.harpsichord)?,
        competition:     WordMatcher::new("tags.competition", &t.competition)?,
        four_hand:       WordMatcher::new("tags.four_hand", &t.four_hand)?,
        young_performer: WordMatcher::new("tags.young_performer", &t.young_performer)?,
        jazz:            WordMatcher::new("tags.jazz", &t.jazz)?,
        young_audience:  WordMatcher::new("tags.young_audience", &t.young_audience)?,
      },
      relevance: RelevanceClassifier::from_tables(tables)?,
    })
  }

  /// The engine built from the embedded keyword tables.
  pub fn builtin() -> &'static TagInferer { &BUILTIN }

  /// Derive the final tag set for an event.
  ///
  /// `seed` holds tags already known (from the scraper or a previous pass).
  /// The result replaces the seed; nothing is merged back into it.
  pub fn infer(&self, seed: &TagSet, event_text: &str, cost: Option<&CostValue>) -> TagSet {
    let text = event_text.to_lowercase().replace(['\r', '\n'], " ");
    let m = &self.matchers;
    let mut tags = seed.clone();

    if m.rehearsal.is_match(&text) {
      tags.insert_tag(Tag::Rehearsal);
    }
    if m.master_class.is_match(&text) {
      tags.insert_tag(Tag::MasterClass);
    }
    if m.vocal.is_match(&text) {
      tags.insert_tag(Tag::Vocal);
      tags.insert_tag(Tag::Ensemble);
    }
    if m.opera.is_match(&text) {
      tags.insert_tag(Tag::Opera);
    }
    if m.premiere.is_match(&text) {
      tags.insert_tag(Tag::Premiere);
    }
    if m.debut.is_match(&text) {
      tags.insert_tag(Tag::Debut);
    }
    // An orchestra mention wins over accompanying-instrument words.
    if m.orchestra.is_match(&text) {
      tags.insert_tag(Tag::Orchestra);
      tags.insert_tag(Tag::Ensemble);
    } else if self.relevance.is_adjacent_relevant(text.as_str()) {
      tags.insert_tag(Tag::ChamberMusic);
      tags.insert_tag(Tag::Collaborative);
      tags.insert_tag(Tag::Ensemble);
    }
    if m.organ.is_match(&text) {
      tags.insert_tag(Tag::Organ);
    }
    if m.fortepiano.is_match(&text) {
      tags.insert_tag(Tag::Fortepiano);
    }
    if m.harpsichord.is_match(&text) {
      tags.insert_tag(Tag::Harpsichord);
    }
    if m.competition.is_match(&text) {
      tags.insert_tag(Tag::Competition);
    }
    if m.four_hand.is_match(&text) {
      tags.insert_tag(Tag::FourHand);
      tags.insert_tag(Tag::Ensemble);
    }
    if m.young_performer.is_match(&text) {
      tags.insert_tag(Tag::YoungPerformer);
    }
    if m.jazz.is_match(&text) {
      tags.insert_tag(Tag::Jazz);
    }

    if cost.is_some_and(CostValue::is_free) {
      tags.insert_tag(Tag::Free);
    }
    if CLASSICAL_MARKERS.iter().any(|t| tags.contains_tag(*t)) {
      tags.insert_tag(Tag::Classical);
    }
    if m.young_audience.is_match(&text) {
      tags.insert_tag(Tag::YoungAudience);
    }
    if tags.contains_tag(Tag::Ensemble) && tags.contains_tag(Tag::Classical) {
      tags.insert_tag(Tag::Collaborative);
    }
    // A keyboard concerto is not collaborative.
    if tags.contains_tag(Tag::Collaborative) && tags.contains_tag(Tag::Orchestra) {
      tags.remove_tag(Tag::Collaborative);
    }

    if tags.contains_tag(Tag::Ensemble) && tags.contains_tag(Tag::Solo) {
      tags.remove_tag(Tag::Solo);
    }
    if tags.contains_tag(Tag::ChamberMusic) && tags.contains_tag(Tag::Orchestra) {
      tags.remove_tag(Tag::ChamberMusic);
    }

    tags
  }

  /// Re-tag a whole record from its description and title.
  ///
  /// The record's tags plus `extra_tags` seed the inference; the record's
  /// tag set is replaced by the result. Returns the joined form.
  pub fn finalize<S: AsRef<str>>(&self, record: &mut EventRecord, extra_tags: &[S]) -> String {
    let text = format!("{} {}", record.description, record.title);
    let mut seed = std::mem::take(&mut record.tags);
    seed.extend(extra_tags.iter().map(|t| t.as_ref().to_owned()));
    record.tags = self.infer(&seed, &text, record.cost_value.as_ref());
    record.tags.joined()
  }
}

/// [`TagInferer::infer`] with the built-in keywords.
pub fn infer_tags(seed: &TagSet, event_text: &str, cost: Option<&CostValue>) -> TagSet {
  TagInferer::builtin().infer(seed, event_text, cost)
}

/// [`TagInferer::finalize`] with the built-in keywords.
pub fn finalize_tags<S: AsRef<str>>(record: &mut EventRecord, extra_tags: &[S]) -> String {
  TagInferer::builtin().finalize(record, extra_tags)
}
