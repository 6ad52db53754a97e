//! Catalog sync: mirror one group's products and prices from upstream.
//!
//! Steps, strictly sequential:
//!   1. resolve the abbreviation against the upstream group list
//!   2. skip if the local group was synced within the TTL
//!   3. fetch and parse products
//!   4. upsert the group (refreshing `synced_at`), then the products
//!   5. fetch prices and append them with `recorded_at = now`
//!
//! No transaction spans steps 4–5: a failed price fetch leaves the products
//! updated without new prices.

use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  attributes::parse_product,
  group::{Group, abbreviation_matches},
  price::Price,
  source::CatalogSource,
  store::CatalogStore,
};

/// Default freshness window for a synced group.
pub const DEFAULT_SYNC_TTL_HOURS: i64 = 24;

/// Outcome of [`sync_set`].
///
/// Serialises as `{"skipped": true}` or
/// `{"skipped": false, "group": ..., "productsUpserted": n, "pricesInserted": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
  pub skipped:           bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub group:             Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub products_upserted: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prices_inserted:   Option<usize>,
}

impl SyncReport {
  pub fn skipped() -> Self {
    Self {
      skipped:           true,
      group:             None,
      products_upserted: None,
      prices_inserted:   None,
    }
  }
}

/// Mirror the group whose abbreviation is `abbreviation` (case-insensitive).
///
/// Returns [`SyncReport::skipped`] without touching upstream again when the
/// local copy is younger than `ttl`. Fails with [`Error::SetNotFound`] before
/// any write when no upstream group matches.
pub async fn sync_set<S, U>(
  store: &S,
  source: &U,
  abbreviation: &str,
  ttl: TimeDelta,
) -> Result<SyncReport>
where
  S: CatalogStore,
  U: CatalogSource,
{
  let groups = source.fetch_groups().await.map_err(Error::upstream)?;
  let upstream = groups
    .into_iter()
    .find(|g| abbreviation_matches(&g.abbreviation, abbreviation))
    .ok_or_else(|| Error::SetNotFound(abbreviation.to_owned()))?;

  let existing = store
    .get_group(upstream.group_id)
    .await
    .map_err(Error::store)?;
  if existing.is_some_and(|g| g.is_fresh(ttl, Utc::now())) {
    tracing::info!(
      group_id = upstream.group_id,
      abbreviation = %upstream.abbreviation,
      "group synced within TTL, skipping"
    );
    return Ok(SyncReport::skipped());
  }

  let raw_products = source
    .fetch_products(upstream.group_id)
    .await
    .map_err(Error::upstream)?;

  let now = Utc::now();
  let products: Vec<_> = raw_products
    .into_iter()
    .map(|raw| parse_product(upstream.group_id, raw, now))
    .collect();

  store
    .upsert_group(Group {
      group_id:     upstream.group_id,
      name:         upstream.name.clone(),
      abbreviation: upstream.abbreviation.clone(),
      synced_at:    Some(now),
    })
    .await
    .map_err(|e| Error::store_write("Groups upsert", e))?;

  let products_upserted = store
    .upsert_products(products)
    .await
    .map_err(|e| Error::store_write("Products upsert", e))?;

  let raw_prices = source
    .fetch_prices(upstream.group_id)
    .await
    .map_err(Error::upstream)?;

  let recorded_at = Utc::now();
  let prices: Vec<_> = raw_prices
    .into_iter()
    .map(|p| Price {
      product_id: p.product_id,
      sub_type_name: p.sub_type_name,
      low_price: p.low_price,
      mid_price: p.mid_price,
      high_price: p.high_price,
      market_price: p.market_price,
      recorded_at,
    })
    .collect();

  let prices_inserted = store
    .insert_prices(prices)
    .await
    .map_err(|e| Error::store_write("Prices insert", e))?;

  tracing::info!(
    group_id = upstream.group_id,
    group = %upstream.name,
    products_upserted,
    prices_inserted,
    "group synced"
  );

  Ok(SyncReport {
    skipped:           false,
    group:             Some(upstream.name),
    products_upserted: Some(products_upserted),
    prices_inserted:   Some(prices_inserted),
  })
}
