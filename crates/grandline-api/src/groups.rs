//! Handler for `GET /groups`.

use axum::{Json, extract::State};
use grandline_core::{source::CatalogSource, store::CatalogStore};
use serde::Serialize;

use crate::{ApiState, error::ApiError};

/// One entry of the set picker.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
  pub group_id:     i64,
  pub name:         String,
  pub abbreviation: String,
}

/// `GET /groups`: the upstream set list, straight through.
pub async fn list<S, U>(
  State(state): State<ApiState<S, U>>,
) -> Result<Json<Vec<GroupSummary>>, ApiError>
where
  S: CatalogStore,
  U: CatalogSource,
{
  let groups = state
    .source
    .fetch_groups()
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;

  Ok(Json(
    groups
      .into_iter()
      .map(|g| GroupSummary {
        group_id:     g.group_id,
        name:         g.name,
        abbreviation: g.abbreviation,
      })
      .collect(),
  ))
}
