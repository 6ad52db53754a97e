//! Price rows and latest-price selection.
//!
//! Prices are append-only: every sync inserts a fresh row per
//! `(product_id, sub_type_name)`, forming a time series. Readers only ever see
//! the newest row of each series.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
  pub product_id:    i64,
  /// Pricing variant, e.g. `"Normal"` or `"Foil"`.
  pub sub_type_name: String,
  pub low_price:     Option<f64>,
  pub mid_price:     Option<f64>,
  pub high_price:    Option<f64>,
  pub market_price:  Option<f64>,
  pub recorded_at:   DateTime<Utc>,
}

/// A price as attached to a [`CardResult`](crate::product::CardResult).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResult {
  pub sub_type_name: String,
  pub market_price:  Option<f64>,
  pub low_price:     Option<f64>,
  pub mid_price:     Option<f64>,
  pub high_price:    Option<f64>,
  pub recorded_at:   DateTime<Utc>,
}

impl From<Price> for PriceResult {
  fn from(p: Price) -> Self {
    Self {
      sub_type_name: p.sub_type_name,
      market_price:  p.market_price,
      low_price:     p.low_price,
      mid_price:     p.mid_price,
      high_price:    p.high_price,
      recorded_at:   p.recorded_at,
    }
  }
}

/// Reduce price rows to one row per `(product_id, sub_type_name)`.
///
/// `rows` must be ordered newest first (`recorded_at` descending); the first
/// row seen for a series is kept and later ones are dropped. Single pass.
pub fn latest_per_sub_type<I>(rows: I) -> HashMap<i64, Vec<PriceResult>>
where
  I: IntoIterator<Item = Price>,
{
  let mut latest: HashMap<i64, Vec<PriceResult>> = HashMap::new();
  let mut seen: HashSet<(i64, String)> = HashSet::new();

  for row in rows {
    if seen.insert((row.product_id, row.sub_type_name.clone())) {
      latest.entry(row.product_id).or_default().push(row.into());
    }
  }

  latest
}

#[cfg(test)]
mod tests {
  use chrono::TimeDelta;

  use super::*;

  fn price(product_id: i64, sub_type: &str, market: f64, at: DateTime<Utc>) -> Price {
    Price {
      product_id,
      sub_type_name: sub_type.into(),
      low_price: None,
      mid_price: None,
      high_price: None,
      market_price: Some(market),
      recorded_at: at,
    }
  }

  #[test]
  fn keeps_first_row_per_sub_type() {
    let now = Utc::now();
    let earlier = now - TimeDelta::days(1);
    let rows = vec![
      price(1, "Normal", 2.0, now),
      price(1, "Foil", 9.0, now),
      price(1, "Normal", 1.0, earlier),
      price(2, "Normal", 5.0, earlier),
      price(1, "Foil", 8.0, earlier),
    ];

    let latest = latest_per_sub_type(rows);

    let one = &latest[&1];
    assert_eq!(one.len(), 2);
    assert_eq!(one[0].sub_type_name, "Normal");
    assert_eq!(one[0].market_price, Some(2.0));
    assert_eq!(one[1].sub_type_name, "Foil");
    assert_eq!(one[1].market_price, Some(9.0));

    let two = &latest[&2];
    assert_eq!(two.len(), 1);
    assert_eq!(two[0].recorded_at, earlier);
  }

  #[test]
  fn empty_input_yields_empty_map() {
    assert!(latest_per_sub_type(Vec::new()).is_empty());
  }
}
