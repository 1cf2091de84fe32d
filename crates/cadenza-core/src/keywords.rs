//! Keyword tables: the curated word lists behind relevance and tagging.
//!
//! The lists are data, not code: a JSON document with a `version` field is
//! embedded at build time and can be swapped for a file at runtime. The
//! order in which tag rules fire is fixed in [`crate::tags`].

use std::{path::Path, sync::LazyLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::Result;

/// The keyword document shipped with the crate.
pub const BUILTIN_KEYWORDS: &str = include_str!("../data/keywords.json");

static BUILTIN: LazyLock<KeywordTables> = LazyLock::new(|| {
  KeywordTables::from_json(BUILTIN_KEYWORDS).expect("built-in keyword tables are valid")
});

/// Words that make an event relevant to the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceKeywords {
  /// The instruments the site is about, plus a few named exceptions.
  pub core:     Vec<String>,
  /// Instruments and voices usually accompanied by the core instruments.
  pub adjacent: Vec<String>,
}

/// Trigger words for each keyword-driven tag rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagKeywords {
  pub rehearsal:       Vec<String>,
  pub master_class:    Vec<String>,
  pub vocal:           Vec<String>,
  pub opera:           Vec<String>,
  pub premiere:        Vec<String>,
  pub debut:           Vec<String>,
  pub orchestra:       Vec<String>,
  pub organ:           Vec<String>,
  pub fortepiano:      Vec<String>,
  pub harpsichord:     Vec<String>,
  pub competition:     Vec<String>,
  pub four_hand:       Vec<String>,
  pub young_performer: Vec<String>,
  pub jazz:            Vec<String>,
  pub young_audience:  Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTables {
  /// Bumped whenever a list is curated; logged when loaded from a file.
  pub version:   u32,
  pub relevance: RelevanceKeywords,
  pub tags:      TagKeywords,
}

impl KeywordTables {
  /// The embedded tables.
  pub fn builtin() -> &'static KeywordTables { &BUILTIN }

  pub fn from_json(json: &str) -> Result<Self> { Ok(serde_json::from_str(json)?) }

  /// Load a replacement keyword document.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let tables = Self::from_json(&raw)?;
    info!(path = %path.display(), version = tables.version, "loaded keyword tables");
    Ok(tables)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtin_core_list() {
    let core = &KeywordTables::builtin().relevance.core;
    assert_eq!(
      core,
      &[
        "celesta", "celestas", "clavichord", "clavichords", "fortepiano",
        "fortepianos", "harpsichord", "harpsichords", "organ", "organs",
        "pianist", "pianists", "piano", "pianos", "yuja",
      ]
    );
  }

  #[test]
  fn builtin_lists_are_lowercase_and_non_empty() {
    let t = KeywordTables::builtin();
    let lists = [
      &t.relevance.core,
      &t.relevance.adjacent,
      &t.tags.rehearsal,
      &t.tags.master_class,
      &t.tags.vocal,
      &t.tags.opera,
      &t.tags.premiere,
      &t.tags.debut,
      &t.tags.orchestra,
      &t.tags.organ,
      &t.tags.fortepiano,
      &t.tags.harpsichord,
      &t.tags.competition,
      &t.tags.four_hand,
      &t.tags.young_performer,
      &t.tags.jazz,
      &t.tags.young_audience,
    ];
    for list in lists {
      assert!(!list.is_empty());
      assert!(list.iter().all(|w| *w == w.to_lowercase()));
    }
  }

  #[test]
  fn core_and_adjacent_are_disjoint() {
    let t = KeywordTables::builtin();
    for word in &t.relevance.core {
      assert!(!t.relevance.adjacent.contains(word), "{word} in both lists");
    }
  }

  #[test]
  fn round_trips_through_json() {
    let t = KeywordTables::builtin();
    let json = serde_json::to_string(t).unwrap();
    assert_eq!(&KeywordTables::from_json(&json).unwrap(), t);
  }

  #[test]
  fn missing_list_is_an_error() {
    assert!(KeywordTables::from_json(r#"{"version": 1}"#).is_err());
  }
}
