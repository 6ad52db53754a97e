//! Server wiring for Grandline: configuration and the top-level router.
//!
//! The binary in `main.rs` loads a [`ServerConfig`], opens the SQLite mirror,
//! builds the upstream client and serves [`router`].

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::Router;
use chrono::TimeDelta;
use grandline_api::ApiState;
use grandline_core::{source::CatalogSource, store::CatalogStore, sync::DEFAULT_SYNC_TTL_HOURS};
use grandline_tcgcsv::{DEFAULT_BASE_URL, TcgcsvConfig};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GRANDLINE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub store_path:            PathBuf,
  pub upstream_base_url:     String,
  pub sync_ttl_hours:        i64,
  /// Per-request upstream timeout. Unset means no timeout.
  pub upstream_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                  "127.0.0.1".to_string(),
      port:                  3000,
      store_path:            PathBuf::from("grandline.db"),
      upstream_base_url:     DEFAULT_BASE_URL.to_string(),
      sync_ttl_hours:        DEFAULT_SYNC_TTL_HOURS,
      upstream_timeout_secs: None,
    }
  }
}

impl ServerConfig {
  pub fn sync_ttl(&self) -> TimeDelta { TimeDelta::hours(self.sync_ttl_hours) }

  pub fn upstream(&self) -> TcgcsvConfig {
    TcgcsvConfig {
      base_url: self.upstream_base_url.clone(),
      timeout:  self.upstream_timeout_secs.map(Duration::from_secs),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router: the JSON API with request tracing.
pub fn router<S, U>(store: Arc<S>, source: Arc<U>, config: &ServerConfig) -> Router
where
  S: CatalogStore + 'static,
  U: CatalogSource + 'static,
{
  let state = ApiState::new(store, source).with_sync_ttl(config.sync_ttl());
  grandline_api::api_router(state).layer(TraceLayer::new_for_http())
}
