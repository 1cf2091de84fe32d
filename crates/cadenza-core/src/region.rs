//! Region membership for reverse-geocoded addresses.

use serde::{Deserialize, Serialize};

/// The parts of a reverse-geocoded address the region rule looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  #[serde(default)]
  pub city:    Option<String>,
  #[serde(default)]
  pub borough: Option<String>,
  #[serde(default)]
  pub suburb:  Option<String>,
}

impl Address {
  /// Borough, or suburb when the geocoder reports no borough.
  pub fn district(&self) -> Option<&str> { self.borough.as_deref().or(self.suburb.as_deref()) }
}

/// Which addresses count as inside the feed's region.
///
/// A point is inside when its city is `city` and, if `excluded_borough` is
/// set, its district is known and is not that borough. Fields missing from
/// a partial configuration keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionRule {
  pub city:             String,
  pub excluded_borough: Option<String>,
}

impl Default for RegionRule {
  fn default() -> Self {
    Self {
      city:             "City of New York".into(),
      excluded_borough: Some("Staten Island".into()),
    }
  }
}

impl RegionRule {
  pub fn contains(&self, address: &Address) -> bool {
    if address.city.as_deref() != Some(self.city.as_str()) {
      return false;
    }
    match &self.excluded_borough {
      None => true,
      Some(excluded) => address.district().is_some_and(|d| d != excluded.as_str()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn address(city: Option<&str>, borough: Option<&str>, suburb: Option<&str>) -> Address {
    Address {
      city:    city.map(str::to_owned),
      borough: borough.map(str::to_owned),
      suburb:  suburb.map(str::to_owned),
    }
  }

  #[test]
  fn default_rule() {
    let rule = RegionRule::default();
    assert!(rule.contains(&address(Some("City of New York"), Some("Manhattan"), None)));
    assert!(!rule.contains(&address(Some("City of New York"), Some("Staten Island"), None)));
    assert!(!rule.contains(&address(Some("Hoboken"), Some("Manhattan"), None)));
    assert!(!rule.contains(&address(None, None, None)));
  }

  #[test]
  fn district_is_required_when_a_borough_is_excluded() {
    let rule = RegionRule::default();
    assert!(!rule.contains(&address(Some("City of New York"), None, None)));
  }

  #[test]
  fn suburb_stands_in_for_borough() {
    let rule = RegionRule::default();
    assert!(rule.contains(&address(Some("City of New York"), None, Some("Brooklyn"))));
    assert!(!rule.contains(&address(Some("City of New York"), None, Some("Staten Island"))));
  }

  #[test]
  fn partial_rule_keeps_defaults() {
    let rule: RegionRule = serde_json::from_str(r#"{"city": "Boston"}"#).unwrap();
    assert_eq!(rule.city, "Boston");
    assert_eq!(rule.excluded_borough.as_deref(), Some("Staten Island"));

    let rule: RegionRule = serde_json::from_str(r#"{"excluded_borough": null}"#).unwrap();
    assert_eq!(rule.city, "City of New York");
    assert_eq!(rule.excluded_borough, None);
  }

  #[test]
  fn rule_without_exclusion() {
    let rule = RegionRule { city: "Boston".into(), excluded_borough: None };
    assert!(rule.contains(&address(Some("Boston"), None, None)));
    assert!(!rule.contains(&address(Some("Cambridge"), None, None)));
  }
}
