//! SQL schema for the Cadenza location cache.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per fixed-point coordinate pair (degrees * 100000, truncated).
CREATE TABLE IF NOT EXISTS location_cache (
    latitude     INTEGER NOT NULL,
    longitude    INTEGER NOT NULL,
    venue        TEXT,              -- backfilled when first known
    is_in_region INTEGER NOT NULL,  -- 0 | 1
    PRIMARY KEY (latitude, longitude)
);

PRAGMA user_version = 1;
";
