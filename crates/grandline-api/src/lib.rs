//! JSON HTTP API for Grandline.
//!
//! Exposes an axum [`Router`] backed by any [`CatalogStore`] for the local
//! mirror and any [`CatalogSource`] for the upstream catalog. Transport and
//! request tracing are the caller's responsibility.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/groups` | Upstream set list |
//! | `GET`  | `/search` | `?q=` or `?name=` (optionally `&set=`) |
//! | `POST` | `/sync`   | `?set=`; 404 if the set is unknown upstream |

pub mod error;
pub mod groups;
pub mod search;
pub mod sync;


use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use chrono::TimeDelta;
use grandline_core::{source::CatalogSource, store::CatalogStore, sync::DEFAULT_SYNC_TTL_HOURS};

pub use error::ApiError;

/// Shared state threaded through every handler.
pub struct ApiState<S, U> {
  pub store:    Arc<S>,
  pub source:   Arc<U>,
  /// Freshness window passed to every sync.
  pub sync_ttl: TimeDelta,
}

impl<S, U> ApiState<S, U> {
  pub fn new(store: Arc<S>, source: Arc<U>) -> Self {
    Self {
      store,
      source,
      sync_ttl: TimeDelta::hours(DEFAULT_SYNC_TTL_HOURS),
    }
  }

  pub fn with_sync_ttl(mut self, ttl: TimeDelta) -> Self {
    self.sync_ttl = ttl;
    self
  }
}

// Derived `Clone` would demand `S: Clone` and `U: Clone`.
impl<S, U> Clone for ApiState<S, U> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      source:   Arc::clone(&self.source),
      sync_ttl: self.sync_ttl,
    }
  }
}

/// Build a fully-materialised API router over `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, U>(state: ApiState<S, U>) -> Router<()>
where
  S: CatalogStore + 'static,
  U: CatalogSource + 'static,
{
  Router::new()
    .route("/groups", get(groups::list::<S, U>))
    .route("/search", get(search::handler::<S, U>))
    .route("/sync", post(sync::handler::<S, U>))
    .with_state(state)
}

/// Treat an empty query value the same as an absent one.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty())
}
