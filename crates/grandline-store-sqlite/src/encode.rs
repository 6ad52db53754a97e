//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so that lexical order matches chronological order.
//! List fields are stored as compact JSON arrays.

use chrono::{DateTime, SecondsFormat, Utc};
use grandline_core::{group::Group, price::Price, product::Product};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Lists ───────────────────────────────────────────────────────────────────

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Wrap `needle` as a `%...%` LIKE pattern, escaping `%`, `_` and `\` so
/// the needle matches literally. Use with `ESCAPE '\'`.
pub fn contains_pattern(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `groups` row.
pub struct RawGroup {
  pub group_id:     i64,
  pub name:         String,
  pub abbreviation: String,
  pub synced_at:    Option<String>,
}

impl RawGroup {
  pub const COLUMNS: &'static str = "group_id, name, abbreviation, synced_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      group_id:     row.get(0)?,
      name:         row.get(1)?,
      abbreviation: row.get(2)?,
      synced_at:    row.get(3)?,
    })
  }

  pub fn into_group(self) -> Result<Group> {
    Ok(Group {
      group_id:     self.group_id,
      name:         self.name,
      abbreviation: self.abbreviation,
      synced_at:    self.synced_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw values read directly from a `products` row.
pub struct RawProduct {
  pub product_id:   i64,
  pub group_id:     i64,
  pub name:         String,
  pub clean_name:   Option<String>,
  pub card_number:  Option<String>,
  pub card_type:    Option<String>,
  pub colors:       String,
  pub rarity:       Option<String>,
  pub cost:         Option<i64>,
  pub power:        Option<i64>,
  pub life:         Option<i64>,
  pub attribute:    Option<String>,
  pub subtypes:     String,
  pub counter_plus: Option<i64>,
  pub description:  Option<String>,
  pub tags:         String,
  pub is_alt_art:   bool,
  pub is_manga:     bool,
  pub is_sp:        bool,
  pub url:          Option<String>,
  pub image_url:    Option<String>,
  pub synced_at:    String,
}

impl RawProduct {
  pub const COLUMNS: &'static str = "product_id, group_id, name, clean_name, card_number, \
     card_type, colors, rarity, cost, power, life, attribute, subtypes, counter_plus, \
     description, tags, is_alt_art, is_manga, is_sp, url, image_url, synced_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      product_id:   row.get(0)?,
      group_id:     row.get(1)?,
      name:         row.get(2)?,
      clean_name:   row.get(3)?,
      card_number:  row.get(4)?,
      card_type:    row.get(5)?,
      colors:       row.get(6)?,
      rarity:       row.get(7)?,
      cost:         row.get(8)?,
      power:        row.get(9)?,
      life:         row.get(10)?,
      attribute:    row.get(11)?,
      subtypes:     row.get(12)?,
      counter_plus: row.get(13)?,
      description:  row.get(14)?,
      tags:         row.get(15)?,
      is_alt_art:   row.get(16)?,
      is_manga:     row.get(17)?,
      is_sp:        row.get(18)?,
      url:          row.get(19)?,
      image_url:    row.get(20)?,
      synced_at:    row.get(21)?,
    })
  }

  pub fn into_product(self) -> Result<Product> {
    Ok(Product {
      product_id:   self.product_id,
      group_id:     self.group_id,
      name:         self.name,
      clean_name:   self.clean_name,
      card_number:  self.card_number,
      card_type:    self.card_type,
      colors:       decode_list(&self.colors)?,
      rarity:       self.rarity,
      cost:         self.cost,
      power:        self.power,
      life:         self.life,
      attribute:    self.attribute,
      subtypes:     decode_list(&self.subtypes)?,
      counter_plus: self.counter_plus,
      description:  self.description,
      tags:         decode_list(&self.tags)?,
      is_alt_art:   self.is_alt_art,
      is_manga:     self.is_manga,
      is_sp:        self.is_sp,
      url:          self.url,
      image_url:    self.image_url,
      synced_at:    decode_dt(&self.synced_at)?,
    })
  }
}

/// A product with its list and timestamp columns already encoded, ready to be
/// moved onto the database thread.
pub struct EncodedProduct {
  pub product:   Product,
  pub colors:    String,
  pub subtypes:  String,
  pub tags:      String,
  pub synced_at: String,
}

impl EncodedProduct {
  pub fn new(product: Product) -> Result<Self> {
    Ok(Self {
      colors:    encode_list(&product.colors)?,
      subtypes:  encode_list(&product.subtypes)?,
      tags:      encode_list(&product.tags)?,
      synced_at: encode_dt(product.synced_at),
      product,
    })
  }
}

/// Raw values read directly from a `prices` row.
pub struct RawPrice {
  pub product_id:    i64,
  pub sub_type_name: String,
  pub low_price:     Option<f64>,
  pub mid_price:     Option<f64>,
  pub high_price:    Option<f64>,
  pub market_price:  Option<f64>,
  pub recorded_at:   String,
}

impl RawPrice {
  pub const COLUMNS: &'static str =
    "product_id, sub_type_name, low_price, mid_price, high_price, market_price, recorded_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      product_id:    row.get(0)?,
      sub_type_name: row.get(1)?,
      low_price:     row.get(2)?,
      mid_price:     row.get(3)?,
      high_price:    row.get(4)?,
      market_price:  row.get(5)?,
      recorded_at:   row.get(6)?,
    })
  }

  pub fn into_price(self) -> Result<Price> {
    Ok(Price {
      product_id:    self.product_id,
      sub_type_name: self.sub_type_name,
      low_price:     self.low_price,
      mid_price:     self.mid_price,
      high_price:    self.high_price,
      market_price:  self.market_price,
      recorded_at:   decode_dt(&self.recorded_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_ordered() {
    let a = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let b = a + chrono::TimeDelta::milliseconds(5);
    let (ea, eb) = (encode_dt(a), encode_dt(b));
    assert_eq!(ea, "2025-03-01T12:00:00.000000Z");
    assert_eq!(ea.len(), eb.len());
    assert!(ea < eb);
    assert_eq!(decode_dt(&eb).unwrap(), b);
  }

  #[test]
  fn contains_pattern_escapes_wildcards() {
    assert_eq!(contains_pattern("Vivi"), "%Vivi%");
    assert_eq!(contains_pattern("100%_x\\"), "%100\\%\\_x\\\\%");
  }

  #[test]
  fn bad_timestamp_is_reported() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
