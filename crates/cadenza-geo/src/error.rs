//! Error type for `cadenza-geo`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("HTTP error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("geocoder returned {status} for {url}")]
  Status {
    status: reqwest::StatusCode,
    url:    String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
