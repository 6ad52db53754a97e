//! Product: a single sellable card listing with its parsed catalog
//! attributes, and the [`CardResult`] read model returned by search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::price::PriceResult;

/// A locally mirrored product row, upserted by sync keyed on `product_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub product_id:   i64,
  pub group_id:     i64,
  pub name:         String,
  pub clean_name:   Option<String>,
  pub card_number:  Option<String>,
  pub card_type:    Option<String>,
  pub colors:       Vec<String>,
  pub rarity:       Option<String>,
  pub cost:         Option<i64>,
  pub power:        Option<i64>,
  pub life:         Option<i64>,
  pub attribute:    Option<String>,
  pub subtypes:     Vec<String>,
  pub counter_plus: Option<i64>,
  pub description:  Option<String>,
  /// Gameplay keywords extracted from `description`.
  pub tags:         Vec<String>,
  pub is_alt_art:   bool,
  pub is_manga:     bool,
  pub is_sp:        bool,
  pub url:          Option<String>,
  pub image_url:    Option<String>,
  pub synced_at:    DateTime<Utc>,
}

/// A search hit: the card's display fields plus its latest price per variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardResult {
  pub product_id:   i64,
  pub name:         String,
  pub card_number:  Option<String>,
  pub card_type:    Option<String>,
  pub colors:       Vec<String>,
  pub rarity:       Option<String>,
  pub cost:         Option<i64>,
  pub power:        Option<i64>,
  pub counter_plus: Option<i64>,
  pub tags:         Vec<String>,
  pub is_alt_art:   bool,
  pub is_manga:     bool,
  pub is_sp:        bool,
  pub url:          Option<String>,
  pub image_url:    Option<String>,
  pub prices:       Vec<PriceResult>,
}

impl CardResult {
  pub fn new(product: Product, prices: Vec<PriceResult>) -> Self {
    Self {
      product_id: product.product_id,
      name: product.name,
      card_number: product.card_number,
      card_type: product.card_type,
      colors: product.colors,
      rarity: product.rarity,
      cost: product.cost,
      power: product.power,
      counter_plus: product.counter_plus,
      tags: product.tags,
      is_alt_art: product.is_alt_art,
      is_manga: product.is_manga,
      is_sp: product.is_sp,
      url: product.url,
      image_url: product.image_url,
      prices,
    }
  }
}
