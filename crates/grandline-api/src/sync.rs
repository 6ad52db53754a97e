//! Handler for `POST /sync`.

use axum::{
  Json,
  extract::{Query, State},
};
use grandline_core::{
  source::CatalogSource,
  store::CatalogStore,
  sync::{SyncReport, sync_set},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, non_empty};

#[derive(Debug, Deserialize, Default)]
pub struct SyncParams {
  pub set: Option<String>,
}

/// `POST /sync?set=<abbr>`
pub async fn handler<S, U>(
  State(state): State<ApiState<S, U>>,
  Query(params): Query<SyncParams>,
) -> Result<Json<SyncReport>, ApiError>
where
  S: CatalogStore,
  U: CatalogSource,
{
  let set = non_empty(params.set)
    .ok_or_else(|| ApiError::BadRequest("Missing ?set= param".to_owned()))?;

  let report = sync_set(&*state.store, &*state.source, &set, state.sync_ttl).await?;
  Ok(Json(report))
}
