//! The `CatalogSource` trait and the upstream record shapes it yields.
//!
//! The upstream catalog is read-only JSON: a group list, and per group a
//! product list and a price list, each wrapped as `{"results": [...]}`.
//! Field names are camelCase on the wire.

use std::future::Future;

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

// ─── Wire records ────────────────────────────────────────────────────────────

/// The `{"results": [...]}` envelope around every upstream list.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
  #[serde(default = "Vec::new")]
  pub results: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamGroup {
  pub group_id:     i64,
  pub name:         String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub abbreviation: String,
}

/// One `{name, displayName, value}` entry of a product's `extendedData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedDataItem {
  pub name:         String,
  #[serde(default)]
  pub display_name: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub value:        String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamProduct {
  pub product_id:    i64,
  pub name:          String,
  #[serde(default)]
  pub clean_name:    Option<String>,
  #[serde(default)]
  pub image_url:     Option<String>,
  #[serde(default)]
  pub url:           Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub extended_data: Vec<ExtendedDataItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPrice {
  pub product_id:    i64,
  pub sub_type_name: String,
  #[serde(default)]
  pub low_price:     Option<f64>,
  #[serde(default)]
  pub mid_price:     Option<f64>,
  #[serde(default)]
  pub high_price:    Option<f64>,
  #[serde(default)]
  pub market_price:  Option<f64>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the upstream catalog service.
///
/// Each call is a single request with no retry; a failed call fails the
/// operation that made it.
pub trait CatalogSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The full group (set) list.
  fn fetch_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<UpstreamGroup>, Self::Error>> + Send + '_;

  /// Every product listed under `group_id`.
  fn fetch_products(
    &self,
    group_id: i64,
  ) -> impl Future<Output = Result<Vec<UpstreamProduct>, Self::Error>> + Send + '_;

  /// Current prices for every product under `group_id`.
  fn fetch_prices(
    &self,
    group_id: i64,
  ) -> impl Future<Output = Result<Vec<UpstreamPrice>, Self::Error>> + Send + '_;
}
