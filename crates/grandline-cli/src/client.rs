//! Async HTTP client wrapping the grandline JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use grandline_core::{product::CardResult, source::UpstreamGroup, sync::SyncReport};
use reqwest::{Client, Response};
use serde::Deserialize;

/// Connection settings for the grandline API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

/// What to search for; mirrors the `GET /search` parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
  pub number: Option<String>,
  pub name:   Option<String>,
  pub set:    Option<String>,
}

/// Async HTTP client for the grandline JSON API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  match resp.json::<ErrorBody>().await {
    Ok(body) => Err(anyhow!("{what} → {status}: {}", body.error)),
    Err(_) => Err(anyhow!("{what} → {status}")),
  }
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET /groups`
  pub async fn groups(&self) -> Result<Vec<UpstreamGroup>> {
    let resp = self
      .client
      .get(self.url("/groups"))
      .send()
      .await
      .context("GET /groups failed")?;
    check(resp, "GET /groups")
      .await?
      .json()
      .await
      .context("deserialising groups")
  }

  /// `GET /search?q=...` or `GET /search?name=...[&set=...]`
  pub async fn search(&self, query: &SearchQuery) -> Result<Vec<CardResult>> {
    let mut params: Vec<(&str, &str)> = Vec::new();
    if let Some(q) = &query.number {
      params.push(("q", q.as_str()));
    }
    if let Some(name) = &query.name {
      params.push(("name", name.as_str()));
    }
    if let Some(set) = &query.set {
      params.push(("set", set.as_str()));
    }

    let resp = self
      .client
      .get(self.url("/search"))
      .query(&params)
      .send()
      .await
      .context("GET /search failed")?;
    check(resp, "GET /search")
      .await?
      .json()
      .await
      .context("deserialising search results")
  }

  /// `POST /sync?set=<abbr>`
  pub async fn sync(&self, set: &str) -> Result<SyncReport> {
    let resp = self
      .client
      .post(self.url("/sync"))
      .query(&[("set", set)])
      .send()
      .await
      .with_context(|| format!("POST /sync?set={set} failed"))?;
    check(resp, "POST /sync")
      .await?
      .json()
      .await
      .context("deserialising sync report")
  }
}
