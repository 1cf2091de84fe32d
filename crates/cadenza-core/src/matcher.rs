//! Whole-word keyword matching.
//!
//! Each keyword list compiles to a single case-insensitive regex of the form
//! `\b(?:kw1|kw2|...)\b`, so "organ" matches "pipe organ" but never
//! "organized". Multi-word phrases are matched literally, including their
//! inner spaces and hyphens.

use regex::Regex;

use crate::{Error, Result};

// ─── Haystack ────────────────────────────────────────────────────────────────

/// Text to be scanned: either one string or a sequence of strings.
///
/// A bare string behaves exactly like a one-element sequence.
pub trait Haystack {
  /// Returns `true` as soon as `predicate` accepts one of the texts.
  fn any_text(&self, predicate: &mut dyn FnMut(&str) -> bool) -> bool;
}

impl Haystack for str {
  fn any_text(&self, predicate: &mut dyn FnMut(&str) -> bool) -> bool {
    predicate(self)
  }
}

impl Haystack for String {
  fn any_text(&self, predicate: &mut dyn FnMut(&str) -> bool) -> bool {
    predicate(self)
  }
}

impl<T: AsRef<str>> Haystack for [T] {
  fn any_text(&self, predicate: &mut dyn FnMut(&str) -> bool) -> bool {
    self.iter().any(|text| predicate(text.as_ref()))
  }
}

impl<T: AsRef<str>, const N: usize> Haystack for [T; N] {
  fn any_text(&self, predicate: &mut dyn FnMut(&str) -> bool) -> bool {
    self.as_slice().any_text(predicate)
  }
}

impl<T: AsRef<str>> Haystack for Vec<T> {
  fn any_text(&self, predicate: &mut dyn FnMut(&str) -> bool) -> bool {
    self.as_slice().any_text(predicate)
  }
}

// ─── Matcher ─────────────────────────────────────────────────────────────────

/// A compiled keyword list.
#[derive(Debug, Clone)]
pub struct WordMatcher {
  regex: Regex,
}

impl WordMatcher {
  /// Compile `keywords` into a matcher. `list` names the list in errors.
  pub fn new<S: AsRef<str>>(list: &str, keywords: &[S]) -> Result<Self> {
    let alternatives: Vec<String> = keywords
      .iter()
      .map(|k| k.as_ref().trim().to_lowercase())
      .filter(|k| !k.is_empty())
      .map(|k| regex::escape(&k))
      .collect();

    if alternatives.is_empty() {
      return Err(Error::EmptyKeywordList(list.to_owned()));
    }

    let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
    let regex = Regex::new(&pattern).map_err(|source| Error::InvalidKeywords {
      list: list.to_owned(),
      source,
    })?;
    Ok(Self { regex })
  }

  pub fn is_match(&self, text: &str) -> bool { self.regex.is_match(text) }

  /// Whether any keyword appears in any text of `haystack`.
  pub fn matches_any<H: Haystack + ?Sized>(&self, haystack: &H) -> bool {
    haystack.any_text(&mut |text| self.is_match(text))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn matcher(words: &[&str]) -> WordMatcher {
    WordMatcher::new("test", words).unwrap()
  }

  #[test]
  fn whole_words_only() {
    let m = matcher(&["organ"]);
    assert!(m.is_match("a pipe organ recital"));
    assert!(m.is_match("Organ."));
    assert!(!m.is_match("organized by friends"));
    assert!(!m.is_match("organs"));
  }

  #[test]
  fn phrases_and_hyphens() {
    let m = matcher(&["four hand", "pre-college"]);
    assert!(m.is_match("music for four hand piano"));
    assert!(m.is_match("the Pre-College division"));
    assert!(!m.is_match("four handed"));
    assert!(!m.is_match("precollege"));
  }

  #[test]
  fn regex_metacharacters_are_literal() {
    let m = matcher(&["st. john"]);
    assert!(m.is_match("live at St. John's tonight"));
    assert!(!m.is_match("live at stx john's tonight"));
  }

  #[test]
  fn sequences_match_any_element() {
    let m = matcher(&["piano"]);
    assert!(m.matches_any(&["nothing here", "solo piano"]));
    assert!(m.matches_any(&vec!["Piano".to_string()]));
    assert!(!m.matches_any(&Vec::<String>::new()));
    assert!(!m.matches_any(""));
  }

  #[test]
  fn empty_list_is_rejected() {
    let err = WordMatcher::new("nothing", &["", "  "]).unwrap_err();
    assert!(matches!(err, Error::EmptyKeywordList(name) if name == "nothing"));
  }
}
