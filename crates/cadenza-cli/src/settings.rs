//! Runtime configuration, layered from an optional TOML file and
//! `CADENZA_`-prefixed environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context as _, Result};
use cadenza_core::region::RegionRule;
use cadenza_geo::{GeocoderConfig, gate::DEFAULT_MIN_INTERVAL};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite location cache. The cache lives in memory when unset.
  pub store_path:       Option<PathBuf>,
  /// Replacement keyword tables (JSON).
  pub keywords_path:    Option<PathBuf>,
  /// Replacement venue alias table (JSON).
  pub venues_path:      Option<PathBuf>,
  /// Venues the calendar already knows about.
  pub known_venues:     Vec<String>,
  /// Tags added to every processed record.
  pub extra_tags:       Vec<String>,
  pub include_adjacent: bool,
  pub geocoder:         GeocoderSettings,
  pub region:           RegionRule,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:       None,
      keywords_path:    None,
      venues_path:      None,
      known_venues:     Vec::new(),
      extra_tags:       Vec::new(),
      include_adjacent: false,
      geocoder:         GeocoderSettings::default(),
      region:           RegionRule::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderSettings {
  pub base_url:          String,
  pub user_agent:        String,
  pub timeout_secs:      u64,
  pub min_interval_secs: u64,
}

impl Default for GeocoderSettings {
  fn default() -> Self {
    let client = GeocoderConfig::default();
    Self {
      base_url:          client.base_url,
      user_agent:        client.user_agent,
      timeout_secs:      client.timeout.as_secs(),
      min_interval_secs: DEFAULT_MIN_INTERVAL.as_secs(),
    }
  }
}

impl GeocoderSettings {
  pub fn client_config(&self) -> GeocoderConfig {
    GeocoderConfig {
      base_url:   self.base_url.clone(),
      user_agent: self.user_agent.clone(),
      timeout:    Duration::from_secs(self.timeout_secs),
    }
  }

  pub fn min_interval(&self) -> Duration { Duration::from_secs(self.min_interval_secs) }
}

impl Settings {
  /// Read `path` if it exists, then apply environment overrides such as
  /// `CADENZA_STORE_PATH` or `CADENZA_GEOCODER__TIMEOUT_SECS`.
  pub fn load(path: &Path) -> Result<Self> { Self::load_with_env(path, None) }

  /// Like [`Settings::load`], reading overrides from `env` instead of the
  /// process environment when given.
  fn load_with_env(path: &Path, env: Option<config::Map<String, String>>) -> Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("CADENZA")
          .prefix_separator("_")
          .separator("__")
          .source(env)
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("known_venues")
          .with_list_parse_key("extra_tags"),
      )
      .build()
      .with_context(|| format!("failed to read config from {}", path.display()))?;

    raw
      .try_deserialize()
      .context("failed to deserialise Settings")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn env(vars: &[(&str, &str)]) -> Option<config::Map<String, String>> {
    Some(
      vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect(),
    )
  }

  #[test]
  fn missing_file_yields_defaults() {
    let settings = Settings::load_with_env(Path::new("/nonexistent/cadenza.toml"), env(&[])).unwrap();
    assert!(settings.store_path.is_none());
    assert!(!settings.include_adjacent);
    assert_eq!(settings.geocoder.timeout_secs, 10);
    assert_eq!(settings.geocoder.min_interval(), Duration::from_secs(5));
    assert_eq!(settings.region, RegionRule::default());
  }

  #[test]
  fn file_values_override_defaults() {
    let path = std::env::temp_dir().join(format!("cadenza-settings-{}.toml", std::process::id()));
    std::fs::write(
      &path,
      r#"
include_adjacent = true
known_venues = ["Steinway Hall", "Klavierhaus"]
extra_tags = ["Imported"]

[geocoder]
base_url = "http://localhost:8080"
min_interval_secs = 1

[region]
city = "Boston"
"#,
    )
    .unwrap();

    let settings = Settings::load_with_env(&path, env(&[])).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(settings.include_adjacent);
    assert_eq!(settings.known_venues, ["Steinway Hall", "Klavierhaus"]);
    assert_eq!(settings.extra_tags, ["Imported"]);
    assert_eq!(settings.geocoder.base_url, "http://localhost:8080");
    assert_eq!(settings.geocoder.timeout_secs, 10);
    assert_eq!(settings.geocoder.min_interval(), Duration::from_secs(1));
    assert_eq!(settings.region.city, "Boston");
    assert_eq!(settings.region.excluded_borough.as_deref(), Some("Staten Island"));
  }

  #[test]
  fn environment_overrides_use_single_underscore_prefix() {
    let settings = Settings::load_with_env(
      Path::new("/nonexistent/cadenza.toml"),
      env(&[
        ("CADENZA_INCLUDE_ADJACENT", "true"),
        ("CADENZA_STORE_PATH", "/var/lib/cadenza/cache.sqlite"),
        ("CADENZA_GEOCODER__TIMEOUT_SECS", "3"),
        ("CADENZA_KNOWN_VENUES", "Steinway Hall,Klavierhaus"),
        ("UNRELATED_STORE_PATH", "/tmp/ignored.sqlite"),
      ]),
    )
    .unwrap();

    assert!(settings.include_adjacent);
    assert_eq!(
      settings.store_path.as_deref(),
      Some(Path::new("/var/lib/cadenza/cache.sqlite"))
    );
    assert_eq!(settings.geocoder.timeout_secs, 3);
    assert_eq!(settings.geocoder.min_interval_secs, 5);
    assert_eq!(settings.known_venues, ["Steinway Hall", "Klavierhaus"]);
  }
}
