//! Venue canonicalization.
//!
//! Scraped venue names come in many spellings. An [`AliasTable`] maps each
//! known spelling to the calendar's canonical name, or marks the venue as one
//! the feed never carries. The table is curated by hand and read-only at
//! runtime.

use std::{
  borrow::Cow,
  collections::{HashMap, HashSet},
  path::Path,
  sync::LazyLock,
};

use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::Result;

/// The alias table shipped with the crate.
pub const BUILTIN_VENUES: &str = include_str!("../data/venues.json");

static BUILTIN: LazyLock<AliasTable> =
  LazyLock::new(|| AliasTable::from_json(BUILTIN_VENUES).expect("built-in venue table is valid"));

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[A-Za-z][A-Za-z0-9]*)(;?)").expect("valid regex")
});

/// Named references that decode even without the closing `;`.
const LEGACY_ENTITIES: &[&str] = &[
  "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY",
  "Ccedil", "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc",
  "Igrave", "Iuml", "LT", "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde",
  "Ouml", "QUOT", "REG", "THORN", "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute",
  "aacute", "acirc", "acute", "aelig", "agrave", "amp", "aring", "atilde", "auml",
  "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg", "divide", "eacute",
  "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt", "iacute",
  "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
  "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm",
  "oslash", "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg",
  "sect", "shy", "sup1", "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc",
  "ugrave", "uml", "uuml", "yacute", "yen", "yuml",
];

/// Table value marking a venue whose events are dropped.
const SKIP_MARKER: &str = "skip";

// ─── Alias ───────────────────────────────────────────────────────────────────

/// What the alias table says about one venue spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenueAlias {
  /// Display the venue under this name.
  Canonical(String),
  /// The scraped spelling is already the canonical name.
  UseRawName,
  /// Events at this venue are out of scope and must be discarded.
  Skip,
}

impl<'de> Deserialize<'de> for VenueAlias {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Ok(match Option::<String>::deserialize(deserializer)? {
      None => VenueAlias::UseRawName,
      Some(name) if name.trim() == SKIP_MARKER => VenueAlias::Skip,
      Some(name) => VenueAlias::Canonical(name.trim().to_owned()),
    })
  }
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// Alias lookups keyed by folded venue name.
///
/// Keys are folded the same way as lookups: HTML entities decoded,
/// diacritics reduced to ASCII, surrounding whitespace and one trailing
/// period removed, lowercased.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
  entries: HashMap<String, VenueAlias>,
}

impl AliasTable {
  /// The embedded table.
  pub fn builtin() -> &'static AliasTable { &BUILTIN }

  pub fn from_json(json: &str) -> Result<Self> {
    let raw: HashMap<String, VenueAlias> = serde_json::from_str(json)?;
    Ok(raw.into_iter().collect())
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let raw = std::fs::read_to_string(path)?;
    Self::from_json(&raw)
  }

  pub fn get(&self, venue: &str) -> Option<&VenueAlias> {
    self.entries.get(&fold_key(venue))
  }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl<K: AsRef<str>> FromIterator<(K, VenueAlias)> for AliasTable {
  fn from_iter<I: IntoIterator<Item = (K, VenueAlias)>>(iter: I) -> Self {
    let entries = iter
      .into_iter()
      .map(|(name, alias)| (fold_key(name.as_ref()), alias))
      .collect();
    Self { entries }
  }
}

// ─── Canonicalization ────────────────────────────────────────────────────────

/// Outcome of canonicalizing a scraped venue name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalVenue {
  Name(String),
  /// The event must be discarded.
  Skip,
}

impl CanonicalVenue {
  pub fn name(&self) -> Option<&str> {
    match self {
      CanonicalVenue::Name(name) => Some(name),
      CanonicalVenue::Skip => None,
    }
  }

  pub fn is_skip(&self) -> bool { matches!(self, CanonicalVenue::Skip) }
}

/// Close unterminated references so they decode like terminated ones.
///
/// Numeric references always qualify. A named one qualifies when it starts
/// with a legacy entity name; the longest such name wins and the rest of the
/// word is kept, so `&ampx` reads as `&` followed by `x`.
fn terminate_entities(raw: &str) -> Cow<'_, str> {
  ENTITY_RE.replace_all(raw, |caps: &Captures<'_>| {
    let name = &caps[1];
    if !caps[2].is_empty() {
      return caps[0].to_owned();
    }
    if name.starts_with('#') {
      return format!("&{name};");
    }
    match LEGACY_ENTITIES
      .iter()
      .filter(|entity| name.starts_with(**entity))
      .max_by_key(|entity| entity.len())
    {
      Some(entity) => format!("&{entity};{}", &name[entity.len()..]),
      None => caps[0].to_owned(),
    }
  })
}

/// Decode entities, fold diacritics to ASCII, trim, and drop one trailing
/// period.
pub fn normalize_venue(raw: &str) -> String {
  let terminated = terminate_entities(raw);
  let decoded = html_escape::decode_html_entities(&terminated);
  if decoded != raw {
    debug!(from = raw, to = %decoded, "decoded venue entities");
  }
  let folded = deunicode::deunicode(&decoded);
  if folded != *decoded {
    debug!(from = %decoded, to = %folded, "folded venue to ascii");
  }
  let trimmed = folded.trim();
  trimmed.strip_suffix('.').unwrap_or(trimmed).trim_end().to_owned()
}

fn fold_key(venue: &str) -> String { normalize_venue(venue).to_lowercase() }

/// Map a scraped venue name to its canonical form.
///
/// Unknown venues keep their normalized spelling. Only a
/// [`VenueAlias::Skip`] entry yields [`CanonicalVenue::Skip`].
pub fn canonicalize_venue(raw: &str, table: &AliasTable) -> CanonicalVenue {
  let normalized = normalize_venue(raw);
  match table.entries.get(&normalized.to_lowercase()) {
    Some(VenueAlias::Skip) => {
      debug!(venue = raw, "venue is marked skip");
      CanonicalVenue::Skip
    }
    Some(VenueAlias::Canonical(name)) => {
      debug!(from = %normalized, to = %name, "translated venue");
      CanonicalVenue::Name(name.clone())
    }
    Some(VenueAlias::UseRawName) | None => CanonicalVenue::Name(normalized),
  }
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// Venue names the calendar already has records for.
#[derive(Debug, Clone, Default)]
pub struct VenueRegistry {
  names: HashSet<String>,
}

impl VenueRegistry {
  /// Whether `venue` would have to be created in the calendar before import.
  ///
  /// An empty registry means the list could not be retrieved, so nothing is
  /// reported.
  pub fn needs_registration(&self, venue: &str) -> bool {
    !self.names.is_empty() && !self.names.contains(venue)
  }

  pub fn len(&self) -> usize { self.names.len() }

  pub fn is_empty(&self) -> bool { self.names.is_empty() }
}

impl<S: Into<String>> FromIterator<S> for VenueRegistry {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self { names: iter.into_iter().map(Into::into).collect() }
  }
}
