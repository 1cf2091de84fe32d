//! `cadenza`: normalize scraped event listings for the calendar feed.
//!
//! # Usage
//!
//! ```
//! cadenza process --input events.json > accepted.json
//! cadenza tags "Liederabend with piano" --cost 0
//! cadenza venue "Steinway Hall."
//! cadenza region 40.7651 -73.9799 --venue "Steinway Hall"
//! ```
//!
//! Logs go to stderr so stdout stays machine-readable.

mod pipeline;
mod settings;

use std::{
  io::{self, Read as _},
  path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use cadenza_core::{
  CanonicalVenue, TagSet, canonicalize_venue,
  keywords::KeywordTables,
  location::{LocationStore, MemoryLocationStore},
  parse_price_range,
  record::{CostValue, EventRecord},
  tags::TagInferer,
  venue::AliasTable,
};
use cadenza_geo::{NominatimClient, RateGate, RegionCache};
use cadenza_store_sqlite::SqliteLocationStore;
use clap::{Parser, Subcommand};
use pipeline::{Pipeline, PipelineConfig};
use settings::Settings;
use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cadenza", version, about = "Classify, tag and normalize event listings")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "cadenza.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run a JSON array of records through the full pipeline and print the
  /// accepted ones.
  Process {
    /// Read records from this file instead of stdin.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,
  },
  /// Print the tags inferred for a piece of event text.
  Tags {
    text: String,
    /// Numeric cost, or "0" for a free event.
    #[arg(long)]
    cost: Option<String>,
    /// Tags already known; may be repeated.
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,
  },
  /// Print the normalized price range found in a pricing text.
  Price { text: String },
  /// Print the canonical name for a scraped venue, or `skip`.
  Venue { raw: String },
  /// Print whether a coordinate lies inside the configured region.
  Region {
    #[arg(allow_negative_numbers = true)]
    latitude:  f64,
    #[arg(allow_negative_numbers = true)]
    longitude: f64,
    #[arg(long)]
    venue:     Option<String>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  match cli.command {
    Command::Price { text } => println!("{}", parse_price_range(&text)),
    Command::Venue { raw } => {
      let aliases = load_aliases(&settings)?;
      match canonicalize_venue(&raw, &aliases) {
        CanonicalVenue::Name(name) => println!("{name}"),
        CanonicalVenue::Skip => println!("skip"),
      }
    }
    Command::Tags { text, cost, tags } => {
      let keywords = load_keywords(&settings)?;
      let inferer = TagInferer::from_tables(&keywords)
        .context("invalid keyword tables")?;
      let seed: TagSet = tags.into_iter().collect();
      let cost = cost.map(parse_cost);
      println!("{}", inferer.infer(&seed, &text, cost.as_ref()).joined());
    }
    command @ (Command::Process { .. } | Command::Region { .. }) => {
      let sqlite = match &settings.store_path {
        Some(path) => open_sqlite_store(path).await,
        None => None,
      };
      match sqlite {
        Some(store) => run_with_store(store, &settings, command).await?,
        None => run_with_store(MemoryLocationStore::new(), &settings, command).await?,
      }
    }
  }

  Ok(())
}

/// Open the configured SQLite cache. A cache that cannot be opened is logged
/// and replaced by an in-memory one; the run goes on without persistence.
async fn open_sqlite_store(path: &Path) -> Option<SqliteLocationStore> {
  match SqliteLocationStore::open(path).await {
    Ok(store) => Some(store),
    Err(e) => {
      warn!(
        path = %path.display(),
        error = %e,
        "failed to open location cache; falling back to in-memory cache"
      );
      None
    }
  }
}

/// The subcommands that consult the location cache.
async fn run_with_store<S: LocationStore>(
  store: S,
  settings: &Settings,
  command: Command,
) -> Result<()> {
  let geocoder = NominatimClient::new(settings.geocoder.client_config())
    .context("failed to build geocoder client")?;
  let region = RegionCache::new(
    store,
    geocoder,
    RateGate::new(settings.geocoder.min_interval()),
    settings.region.clone(),
  );

  match command {
    Command::Region { latitude, longitude, venue } => {
      println!("{}", region.is_in_region(latitude, longitude, venue.as_deref()).await);
    }
    Command::Process { input } => {
      let raw = match &input {
        Some(path) => std::fs::read_to_string(path)
          .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
          let mut buf = String::new();
          io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
          buf
        }
      };
      let records: Vec<EventRecord> =
        serde_json::from_str(&raw).context("input is not a JSON array of records")?;

      let config = PipelineConfig {
        keywords:         load_keywords(settings)?,
        aliases:          load_aliases(settings)?,
        registry:         settings.known_venues.iter().cloned().collect(),
        extra_tags:       settings.extra_tags.clone(),
        include_adjacent: settings.include_adjacent,
      };
      let pipeline = Pipeline::new(config, region).context("invalid keyword tables")?;

      let today = chrono::Local::now().date_naive();
      let accepted = pipeline.process(records, today).await;
      serde_json::to_writer_pretty(io::stdout().lock(), &accepted)
        .context("failed to write records")?;
      println!();
    }
    Command::Tags { .. } | Command::Price { .. } | Command::Venue { .. } => {}
  }
  Ok(())
}

fn load_keywords(settings: &Settings) -> Result<KeywordTables> {
  match &settings.keywords_path {
    Some(path) => KeywordTables::from_path(path)
      .with_context(|| format!("failed to load keyword tables from {}", path.display())),
    None => Ok(KeywordTables::builtin().clone()),
  }
}

fn load_aliases(settings: &Settings) -> Result<AliasTable> {
  match &settings.venues_path {
    Some(path) => AliasTable::from_path(path)
      .with_context(|| format!("failed to load venue aliases from {}", path.display())),
    None => Ok(AliasTable::builtin().clone()),
  }
}

/// A cost argument is numeric when it parses as one.
fn parse_cost(raw: String) -> CostValue {
  match raw.trim().parse::<f64>() {
    Ok(amount) => CostValue::Amount(amount),
    Err(_) => CostValue::Text(raw),
  }
}
