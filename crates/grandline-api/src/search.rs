//! Handler for `GET /search`.
//!
//! Exactly one mode runs per request, chosen in this order:
//!
//! 1. `?q=<card number>`: exact card-number match.
//! 2. `?name=<n>&set=<abbr>`: name match within a set. If the set yields
//!    nothing (or has never been synced), the set is synced and the search
//!    retried once.
//! 3. `?name=<n>`: name match across every synced set.

use axum::{
  Json,
  extract::{Query, State},
};
use grandline_core::{
  product::CardResult,
  search::{search_by_card_number, search_by_name, search_by_name_global},
  source::CatalogSource,
  store::CatalogStore,
  sync::sync_set,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, non_empty};

pub const USAGE: &str = "Provide either ?q= or ?name= (optionally with &set=)";

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Card number, e.g. `EB03-001`.
  pub q:    Option<String>,
  /// Case-insensitive substring of the card name.
  pub name: Option<String>,
  /// Set abbreviation, e.g. `OP01`.
  pub set:  Option<String>,
}

/// `GET /search[?q=...][&name=...][&set=...]`
pub async fn handler<S, U>(
  State(state): State<ApiState<S, U>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<CardResult>>, ApiError>
where
  S: CatalogStore,
  U: CatalogSource,
{
  let q = non_empty(params.q);
  let name = non_empty(params.name);
  let set = non_empty(params.set);

  let results = match (q, name, set) {
    (Some(q), _, _) => search_by_card_number(&*state.store, &q).await?,
    (None, Some(name), Some(set)) => scoped_with_fallback(&state, &name, &set).await?,
    (None, Some(name), None) => search_by_name_global(&*state.store, &name).await?,
    (None, None, _) => return Err(ApiError::BadRequest(USAGE.to_owned())),
  };
  Ok(Json(results))
}

/// Scoped name search, syncing the set and retrying once on an empty result.
///
/// Failures during the sync or the retry are logged and yield `[]`.
async fn scoped_with_fallback<S, U>(
  state: &ApiState<S, U>,
  name: &str,
  set: &str,
) -> Result<Vec<CardResult>, ApiError>
where
  S: CatalogStore,
  U: CatalogSource,
{
  match search_by_name(&*state.store, name, set).await {
    Ok(results) if !results.is_empty() => return Ok(results),
    Ok(_) => {}
    Err(e) if e.is_set_not_found() => {}
    Err(e) => return Err(e.into()),
  }

  tracing::info!(%set, "no local results, syncing set before retry");
  if let Err(e) = sync_set(&*state.store, &*state.source, set, state.sync_ttl).await {
    tracing::warn!(%set, error = %e, "sync during search fallback failed");
    return Ok(Vec::new());
  }

  match search_by_name(&*state.store, name, set).await {
    Ok(results) => Ok(results),
    Err(e) => {
      tracing::warn!(%set, error = %e, "search retry after sync failed");
      Ok(Vec::new())
    }
  }
}
