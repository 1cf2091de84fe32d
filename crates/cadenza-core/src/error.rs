//! Error types for `cadenza-core`.
//!
//! Only table loading can fail. Classification, tagging and normalization
//! never return errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("keyword list {list:?} does not compile: {source}")]
  InvalidKeywords {
    list:   String,
    #[source]
    source: regex::Error,
  },

  #[error("keyword list {0:?} is empty")]
  EmptyKeywordList(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
