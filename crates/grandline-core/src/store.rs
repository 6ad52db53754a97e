//! The `CatalogStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `grandline-store-sqlite`). The sync and search routines depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{group::Group, price::Price, product::Product};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`CatalogStore::find_products`]. All set filters must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
  /// Case-insensitive exact match on `card_number`.
  pub card_number: Option<String>,
  /// Case-insensitive substring match on `name`, matched literally.
  pub name:        Option<String>,
  /// Restrict to one group.
  pub group_id:    Option<i64>,
}

impl ProductQuery {
  pub fn card_number(number: impl Into<String>) -> Self {
    Self { card_number: Some(number.into()), ..Self::default() }
  }

  pub fn name(name: impl Into<String>) -> Self {
    Self { name: Some(name.into()), ..Self::default() }
  }

  pub fn in_group(mut self, group_id: i64) -> Self {
    self.group_id = Some(group_id);
    self
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the local catalog mirror.
///
/// Groups and products are upserted keyed on their upstream ids. Prices are
/// append-only; nothing ever updates or deletes a price row.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Groups ────────────────────────────────────────────────────────────

  /// Retrieve a group by upstream id. Returns `None` if never synced.
  fn get_group(
    &self,
    group_id: i64,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + '_;

  /// Look a group up by abbreviation, ignoring case.
  fn find_group_by_abbreviation<'a>(
    &'a self,
    abbreviation: &'a str,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + 'a;

  /// Insert the group, or overwrite name, abbreviation and `synced_at`.
  fn upsert_group(
    &self,
    group: Group,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Products ──────────────────────────────────────────────────────────

  /// Insert or overwrite every product keyed on `product_id`. Returns the
  /// number of rows written.
  fn upsert_products(
    &self,
    products: Vec<Product>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Return the products matching `query`.
  fn find_products<'a>(
    &'a self,
    query: &'a ProductQuery,
  ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send + 'a;

  // ── Prices (append-only) ──────────────────────────────────────────────

  /// Append price rows. Returns the number of rows inserted.
  fn insert_prices(
    &self,
    prices: Vec<Price>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Every price row for `product_ids`, newest `recorded_at` first. Rows
  /// with equal timestamps come back most recently inserted first.
  fn prices_for_products<'a>(
    &'a self,
    product_ids: &'a [i64],
  ) -> impl Future<Output = Result<Vec<Price>, Self::Error>> + Send + 'a;
}
