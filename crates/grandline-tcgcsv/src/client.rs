//! [`TcgcsvClient`]: async HTTP client for the upstream catalog.

use std::time::Duration;

use grandline_core::source::{
  CatalogSource, Envelope, UpstreamGroup, UpstreamPrice, UpstreamProduct,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// The One Piece Card Game category on tcgcsv.com.
pub const DEFAULT_BASE_URL: &str = "https://tcgcsv.com/tcgplayer/68";

const USER_AGENT: &str = concat!("grandline/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the upstream catalog.
#[derive(Debug, Clone)]
pub struct TcgcsvConfig {
  pub base_url: String,
  /// Per-request timeout. `None` waits indefinitely.
  pub timeout:  Option<Duration>,
}

impl Default for TcgcsvConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      timeout:  None,
    }
  }
}

/// Async HTTP client for the tcgcsv JSON endpoints.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct TcgcsvClient {
  client:   Client,
  base_url: String,
}

impl TcgcsvClient {
  pub fn new(config: TcgcsvConfig) -> Result<Self> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(Error::Build)?;
    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
    })
  }

  fn url(&self, path: &str) -> String { format!("{}{path}", self.base_url) }

  /// `GET {base}{path}` and unwrap the `results` envelope.
  async fn get_results<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
    let url = self.url(path);
    tracing::debug!(%url, "fetching upstream");

    let resp = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|source| Error::Request { url: url.clone(), source })?;

    if !resp.status().is_success() {
      return Err(Error::Status { url, status: resp.status() });
    }

    let envelope: Envelope<T> = resp
      .json()
      .await
      .map_err(|source| Error::Request { url: url.clone(), source })?;
    tracing::debug!(%url, count = envelope.results.len(), "fetched upstream");
    Ok(envelope.results)
  }
}

impl CatalogSource for TcgcsvClient {
  type Error = Error;

  async fn fetch_groups(&self) -> Result<Vec<UpstreamGroup>> {
    self.get_results("/groups").await
  }

  async fn fetch_products(&self, group_id: i64) -> Result<Vec<UpstreamProduct>> {
    self.get_results(&format!("/{group_id}/products")).await
  }

  async fn fetch_prices(&self, group_id: i64) -> Result<Vec<UpstreamPrice>> {
    self.get_results(&format!("/{group_id}/prices")).await
  }
}
