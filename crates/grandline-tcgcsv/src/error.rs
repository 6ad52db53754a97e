//! Error type for `grandline-tcgcsv`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("request to {url} failed: {source}")]
  Request {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("GET {url} → {status}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },

  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
