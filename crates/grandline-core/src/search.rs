//! Search over the local mirror, with latest-price attachment.
//!
//! Three entry points: exact card number, name within a set, and name across
//! every set. Each runs one product query and at most one price query.

use crate::{
  Error, Result,
  price::latest_per_sub_type,
  product::{CardResult, Product},
  store::{CatalogStore, ProductQuery},
};

/// Attach the newest price per sub-type to each product.
///
/// Issues a single price query for the whole batch.
pub async fn attach_prices<S>(store: &S, products: Vec<Product>) -> Result<Vec<CardResult>>
where
  S: CatalogStore,
{
  if products.is_empty() {
    return Ok(Vec::new());
  }

  let ids: Vec<i64> = products.iter().map(|p| p.product_id).collect();
  let rows = store
    .prices_for_products(&ids)
    .await
    .map_err(Error::store)?;
  let mut latest = latest_per_sub_type(rows);

  Ok(
    products
      .into_iter()
      .map(|p| {
        let prices = latest.remove(&p.product_id).unwrap_or_default();
        CardResult::new(p, prices)
      })
      .collect(),
  )
}

async fn run<S>(store: &S, query: &ProductQuery) -> Result<Vec<CardResult>>
where
  S: CatalogStore,
{
  let products = store.find_products(query).await.map_err(Error::store)?;
  attach_prices(store, products).await
}

/// Cards whose number equals `card_number`, ignoring case (e.g. `eb03-001`).
pub async fn search_by_card_number<S>(store: &S, card_number: &str) -> Result<Vec<CardResult>>
where
  S: CatalogStore,
{
  run(store, &ProductQuery::card_number(card_number)).await
}

/// Cards in the set `set` whose name contains `name`, ignoring case.
///
/// Fails with [`Error::SetNotFound`] if the set has never been synced.
pub async fn search_by_name<S>(store: &S, name: &str, set: &str) -> Result<Vec<CardResult>>
where
  S: CatalogStore,
{
  let group = store
    .find_group_by_abbreviation(set)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::SetNotFound(set.to_owned()))?;

  run(store, &ProductQuery::name(name).in_group(group.group_id)).await
}

/// Cards in any synced set whose name contains `name`, ignoring case.
pub async fn search_by_name_global<S>(store: &S, name: &str) -> Result<Vec<CardResult>>
where
  S: CatalogStore,
{
  run(store, &ProductQuery::name(name)).await
}
