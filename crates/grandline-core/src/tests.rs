//! Sync and search tests against in-memory fakes of the store and upstream.

use std::{
  collections::HashMap,
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use chrono::{TimeDelta, Utc};

use crate::{
  Error,
  group::{Group, abbreviation_matches},
  price::Price,
  product::Product,
  search::{search_by_card_number, search_by_name, search_by_name_global},
  source::{CatalogSource, ExtendedDataItem, UpstreamGroup, UpstreamPrice, UpstreamProduct},
  store::{CatalogStore, ProductQuery},
  sync::{DEFAULT_SYNC_TTL_HOURS, SyncReport, sync_set},
};

#[derive(Debug, thiserror::Error)]
#[error("fake failure: {0}")]
struct FakeError(&'static str);

// ─── In-memory store ─────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryStore {
  groups:   Mutex<HashMap<i64, Group>>,
  products: Mutex<HashMap<i64, Product>>,
  prices:   Mutex<Vec<Price>>,
}

impl CatalogStore for MemoryStore {
  type Error = FakeError;

  async fn get_group(&self, group_id: i64) -> Result<Option<Group>, FakeError> {
    Ok(self.groups.lock().unwrap().get(&group_id).cloned())
  }

  async fn find_group_by_abbreviation(&self, abbreviation: &str) -> Result<Option<Group>, FakeError> {
    Ok(
      self
        .groups
        .lock()
        .unwrap()
        .values()
        .find(|g| abbreviation_matches(&g.abbreviation, abbreviation))
        .cloned(),
    )
  }

  async fn upsert_group(&self, group: Group) -> Result<(), FakeError> {
    self.groups.lock().unwrap().insert(group.group_id, group);
    Ok(())
  }

  async fn upsert_products(&self, products: Vec<Product>) -> Result<usize, FakeError> {
    let mut map = self.products.lock().unwrap();
    let n = products.len();
    for p in products {
      map.insert(p.product_id, p);
    }
    Ok(n)
  }

  async fn find_products(&self, query: &ProductQuery) -> Result<Vec<Product>, FakeError> {
    let mut hits: Vec<Product> = self
      .products
      .lock()
      .unwrap()
      .values()
      .filter(|p| {
        query.card_number.as_ref().is_none_or(|n| {
          p.card_number
            .as_ref()
            .is_some_and(|c| c.to_lowercase() == n.to_lowercase())
        }) && query
          .name
          .as_ref()
          .is_none_or(|n| p.name.to_lowercase().contains(&n.to_lowercase()))
          && query.group_id.is_none_or(|g| p.group_id == g)
      })
      .cloned()
      .collect();
    hits.sort_by_key(|p| p.product_id);
    Ok(hits)
  }

  async fn insert_prices(&self, prices: Vec<Price>) -> Result<usize, FakeError> {
    let n = prices.len();
    self.prices.lock().unwrap().extend(prices);
    Ok(n)
  }

  async fn prices_for_products(&self, product_ids: &[i64]) -> Result<Vec<Price>, FakeError> {
    let mut rows: Vec<(usize, Price)> = self
      .prices
      .lock()
      .unwrap()
      .iter()
      .cloned()
      .enumerate()
      .filter(|(_, p)| product_ids.contains(&p.product_id))
      .collect();
    rows.sort_by(|(ia, a), (ib, b)| b.recorded_at.cmp(&a.recorded_at).then(ib.cmp(ia)));
    Ok(rows.into_iter().map(|(_, p)| p).collect())
  }
}

// ─── Static upstream ─────────────────────────────────────────────────────────

#[derive(Default)]
struct StaticSource {
  groups:         Vec<UpstreamGroup>,
  products:       HashMap<i64, Vec<UpstreamProduct>>,
  prices:         HashMap<i64, Vec<UpstreamPrice>>,
  fail_prices:    bool,
  group_calls:    AtomicUsize,
  product_calls:  AtomicUsize,
  price_calls:    AtomicUsize,
}

impl StaticSource {
  fn catalog_calls(&self) -> usize {
    self.product_calls.load(Ordering::SeqCst) + self.price_calls.load(Ordering::SeqCst)
  }
}

impl CatalogSource for StaticSource {
  type Error = FakeError;

  async fn fetch_groups(&self) -> Result<Vec<UpstreamGroup>, FakeError> {
    self.group_calls.fetch_add(1, Ordering::SeqCst);
    Ok(self.groups.clone())
  }

  async fn fetch_products(&self, group_id: i64) -> Result<Vec<UpstreamProduct>, FakeError> {
    self.product_calls.fetch_add(1, Ordering::SeqCst);
    Ok(self.products.get(&group_id).cloned().unwrap_or_default())
  }

  async fn fetch_prices(&self, group_id: i64) -> Result<Vec<UpstreamPrice>, FakeError> {
    self.price_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_prices {
      return Err(FakeError("prices endpoint down"));
    }
    Ok(self.prices.get(&group_id).cloned().unwrap_or_default())
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

const EB03: i64 = 24001;

fn ext(name: &str, value: &str) -> ExtendedDataItem {
  ExtendedDataItem {
    name:         name.into(),
    display_name: None,
    value:        value.into(),
  }
}

fn upstream_product(product_id: i64, name: &str, number: &str) -> UpstreamProduct {
  UpstreamProduct {
    product_id,
    name: name.into(),
    clean_name: None,
    image_url: None,
    url: None,
    extended_data: vec![
      ext("Number", number),
      ext("Color", "Blue;Purple"),
      ext("Cost", "4"),
      ext("Description", "[On Play] [Unknown] Look at 3 cards."),
    ],
  }
}

fn upstream_price(product_id: i64, sub_type: &str, market: f64) -> UpstreamPrice {
  UpstreamPrice {
    product_id,
    sub_type_name: sub_type.into(),
    low_price: None,
    mid_price: None,
    high_price: None,
    market_price: Some(market),
  }
}

fn source() -> StaticSource {
  StaticSource {
    groups: vec![
      UpstreamGroup {
        group_id:     EB03,
        name:         "Heroines Edition".into(),
        abbreviation: "EB-03".into(),
      },
      UpstreamGroup {
        group_id:     3188,
        name:         "Romance Dawn".into(),
        abbreviation: "OP01".into(),
      },
    ],
    products: HashMap::from([(
      EB03,
      vec![
        upstream_product(1, "Vivi", "EB03-001"),
        upstream_product(2, "Vivi (Alternate Art)", "EB03-001"),
        upstream_product(3, "Nami", "EB03-002"),
      ],
    )]),
    prices: HashMap::from([(
      EB03,
      vec![
        upstream_price(1, "Normal", 0.5),
        upstream_price(2, "Foil", 12.0),
        upstream_price(3, "Normal", 1.0),
      ],
    )]),
    ..StaticSource::default()
  }
}

fn ttl() -> TimeDelta { TimeDelta::hours(DEFAULT_SYNC_TTL_HOURS) }

// ─── Sync ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sync_writes_group_products_and_prices() {
  let store = MemoryStore::default();
  let src = source();

  let report = sync_set(&store, &src, "EB-03", ttl()).await.unwrap();

  assert_eq!(report, SyncReport {
    skipped:           false,
    group:             Some("Heroines Edition".into()),
    products_upserted: Some(3),
    prices_inserted:   Some(3),
  });

  let group = store.get_group(EB03).await.unwrap().unwrap();
  assert!(group.synced_at.is_some());

  let vivi = store.products.lock().unwrap()[&1].clone();
  assert_eq!(vivi.group_id, EB03);
  assert_eq!(vivi.colors, vec!["Blue", "Purple"]);
  assert_eq!(vivi.cost, Some(4));
  assert_eq!(vivi.tags, vec!["On Play"]);
  assert!(store.products.lock().unwrap()[&2].is_alt_art);
}

#[tokio::test]
async fn sync_matches_abbreviation_ignoring_case() {
  let store = MemoryStore::default();
  let report = sync_set(&store, &source(), "eb-03", ttl()).await.unwrap();
  assert!(!report.skipped);
}

#[tokio::test]
async fn sync_within_ttl_skips_catalog_fetches() {
  let store = MemoryStore::default();
  store
    .upsert_group(Group {
      group_id:     EB03,
      name:         "Heroines Edition".into(),
      abbreviation: "EB-03".into(),
      synced_at:    Some(Utc::now() - TimeDelta::hours(1)),
    })
    .await
    .unwrap();
  let src = source();

  let report = sync_set(&store, &src, "EB-03", ttl()).await.unwrap();

  assert_eq!(report, SyncReport::skipped());
  assert_eq!(src.catalog_calls(), 0);
  assert!(store.products.lock().unwrap().is_empty());
  assert!(store.prices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sync_after_ttl_refreshes() {
  let store = MemoryStore::default();
  let stale = Utc::now() - TimeDelta::hours(25);
  store
    .upsert_group(Group {
      group_id:     EB03,
      name:         "Old name".into(),
      abbreviation: "EB-03".into(),
      synced_at:    Some(stale),
    })
    .await
    .unwrap();
  let src = source();

  let report = sync_set(&store, &src, "EB-03", ttl()).await.unwrap();

  assert!(!report.skipped);
  assert_eq!(src.catalog_calls(), 2);
  let group = store.get_group(EB03).await.unwrap().unwrap();
  assert_eq!(group.name, "Heroines Edition");
  assert!(group.synced_at.unwrap() > stale);
}

#[tokio::test]
async fn sync_unknown_set_fails_without_writes() {
  let store = MemoryStore::default();
  let src = source();

  let err = sync_set(&store, &src, "OP99", ttl()).await.unwrap_err();

  assert!(matches!(err, Error::SetNotFound(ref s) if s == "OP99"));
  assert_eq!(err.to_string(), "Set not found: OP99");
  assert_eq!(src.catalog_calls(), 0);
  assert!(store.groups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn price_fetch_failure_keeps_products() {
  let store = MemoryStore::default();
  let src = StaticSource { fail_prices: true, ..source() };

  let err = sync_set(&store, &src, "EB-03", ttl()).await.unwrap_err();

  assert!(matches!(err, Error::Upstream(_)));
  assert_eq!(store.products.lock().unwrap().len(), 3);
  assert!(store.prices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn repeated_sync_appends_prices() {
  let store = MemoryStore::default();
  let src = source();

  sync_set(&store, &src, "EB-03", TimeDelta::zero()).await.unwrap();
  sync_set(&store, &src, "EB-03", TimeDelta::zero()).await.unwrap();

  assert_eq!(store.products.lock().unwrap().len(), 3);
  assert_eq!(store.prices.lock().unwrap().len(), 6);
}

// ─── Search ──────────────────────────────────────────────────────────────────

async fn synced_store() -> MemoryStore {
  let store = MemoryStore::default();
  sync_set(&store, &source(), "EB-03", ttl()).await.unwrap();
  store
}

#[tokio::test]
async fn search_by_card_number_ignores_case() {
  let store = synced_store().await;

  let hits = search_by_card_number(&store, "eb03-001").await.unwrap();
  assert_eq!(hits.len(), 2);
  assert!(hits.iter().all(|c| c.card_number.as_deref() == Some("EB03-001")));

  assert!(search_by_card_number(&store, "EB03-999").await.unwrap().is_empty());
}

#[tokio::test]
async fn search_by_name_scoped_to_set() {
  let store = synced_store().await;

  let hits = search_by_name(&store, "vivi", "eb-03").await.unwrap();
  assert_eq!(hits.len(), 2);
  assert_eq!(hits[1].prices.len(), 1);
  assert_eq!(hits[1].prices[0].sub_type_name, "Foil");
  assert_eq!(hits[1].prices[0].market_price, Some(12.0));
}

#[tokio::test]
async fn search_by_name_unknown_set() {
  let store = synced_store().await;
  let err = search_by_name(&store, "Vivi", "OP01").await.unwrap_err();
  assert!(err.is_set_not_found());
}

#[tokio::test]
async fn search_by_name_global_spans_sets() {
  let store = synced_store().await;
  let nami = store.products.lock().unwrap()[&3].clone();
  store
    .upsert_products(vec![Product { group_id: 3188, product_id: 99, ..nami }])
    .await
    .unwrap();

  let hits = search_by_name_global(&store, "NAM").await.unwrap();
  assert_eq!(hits.len(), 2);
  assert!(hits.iter().find(|c| c.product_id == 99).unwrap().prices.is_empty());
}

#[tokio::test]
async fn search_attaches_latest_price_per_sub_type() {
  let store = synced_store().await;
  let older = Utc::now() - TimeDelta::days(2);
  store
    .insert_prices(vec![
      Price {
        product_id:    3,
        sub_type_name: "Normal".into(),
        low_price:     None,
        mid_price:     None,
        high_price:    None,
        market_price:  Some(99.0),
        recorded_at:   older,
      },
      Price {
        product_id:    3,
        sub_type_name: "Foil".into(),
        low_price:     None,
        mid_price:     None,
        high_price:    None,
        market_price:  Some(3.0),
        recorded_at:   older,
      },
    ])
    .await
    .unwrap();

  let hits = search_by_card_number(&store, "EB03-002").await.unwrap();
  let prices = &hits[0].prices;
  assert_eq!(prices.len(), 2);
  let normal = prices.iter().find(|p| p.sub_type_name == "Normal").unwrap();
  assert_eq!(normal.market_price, Some(1.0));
  let foil = prices.iter().find(|p| p.sub_type_name == "Foil").unwrap();
  assert_eq!(foil.recorded_at, older);
}
