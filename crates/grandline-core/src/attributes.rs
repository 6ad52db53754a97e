//! Parsing of upstream product attributes into typed [`Product`] fields.
//!
//! Pipeline:
//!   UpstreamProduct
//!     └─ extended_data_map()  → HashMap<name, value>
//!          └─ split_list / safe_int / extract_tags → typed fields
//!               └─ name flags → Product
//!
//! Pure synchronous functions; no I/O.

use std::{
  collections::{HashMap, HashSet},
  sync::LazyLock,
};

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::{
  product::Product,
  source::{ExtendedDataItem, UpstreamProduct},
};

/// Bracketed keywords from card text that are kept as tags.
pub const GAMEPLAY_TAGS: &[&str] = &[
  "Rush",
  "Blocker",
  "Double Attack",
  "Counter",
  "Trigger",
  "Activate: Main",
  "Once Per Turn",
  "On Play",
  "On K.O.",
  "When Attacking",
  "Opponent's Turn",
  "Your Turn",
  "End of Your Turn",
  "Main",
  "On Block",
];

static BRACKETED: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("static regex"));

static DON_TAG: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^DON!! x\d+$").expect("static regex"));

// ─── Low-level helpers ───────────────────────────────────────────────────────

/// Flatten `extendedData` into a name → value map. A repeated name keeps the
/// last value.
pub fn extended_data_map(items: &[ExtendedDataItem]) -> HashMap<&str, &str> {
  items
    .iter()
    .map(|item| (item.name.as_str(), item.value.as_str()))
    .collect()
}

/// Split a `;`-separated list, trimming entries and dropping empty ones.
pub fn split_list(value: Option<&str>) -> Vec<String> {
  value
    .map(|v| {
      v.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
    })
    .unwrap_or_default()
}

/// Parse the leading base-10 integer of `value`.
///
/// Leading whitespace and a sign are accepted and trailing garbage is
/// ignored (`"2000+"` → 2000). Missing, empty or non-numeric input yields
/// `None`, as does a value that does not fit in `i64`.
pub fn safe_int(value: Option<&str>) -> Option<i64> {
  let s = value?.trim_start();
  let (sign, rest) = match s.as_bytes().first() {
    Some(b'-') => ("-", &s[1..]),
    Some(b'+') => ("", &s[1..]),
    _ => ("", s),
  };
  let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
  if digits_len == 0 {
    return None;
  }
  format!("{sign}{}", &rest[..digits_len]).parse().ok()
}

fn is_gameplay_tag(tag: &str) -> bool {
  GAMEPLAY_TAGS.contains(&tag) || DON_TAG.is_match(tag)
}

/// Pull gameplay keywords out of card text.
///
/// Every `[...]` substring is a candidate; known keywords and `DON!! xN`
/// costs are kept in order of first appearance, duplicates dropped.
pub fn extract_tags(description: &str) -> Vec<String> {
  let mut seen = HashSet::new();
  BRACKETED
    .captures_iter(description)
    .filter_map(|c| c.get(1))
    .map(|m| m.as_str())
    .filter(|tag| is_gameplay_tag(tag) && seen.insert(*tag))
    .map(str::to_owned)
    .collect()
}

// ─── Name flags ──────────────────────────────────────────────────────────────

/// Printing variants encoded as suffixes in the product name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameFlags {
  pub is_alt_art: bool,
  pub is_manga:   bool,
  pub is_sp:      bool,
}

impl NameFlags {
  pub fn from_name(name: &str) -> Self {
    Self {
      is_alt_art: name.contains("(Alternate Art)"),
      is_manga:   name.contains("(Manga)"),
      is_sp:      name.contains("(SP)"),
    }
  }
}

// ─── Product ─────────────────────────────────────────────────────────────────

/// Build the product row stored for `raw` under `group_id`.
pub fn parse_product(
  group_id: i64,
  raw: UpstreamProduct,
  synced_at: DateTime<Utc>,
) -> Product {
  let ext = extended_data_map(&raw.extended_data);
  let text = |key: &str| ext.get(key).map(|v| (*v).to_owned());
  let flags = NameFlags::from_name(&raw.name);
  let description = text("Description");

  Product {
    product_id:   raw.product_id,
    group_id,
    clean_name:   raw.clean_name,
    card_number:  text("Number"),
    card_type:    text("CardType"),
    colors:       split_list(ext.get("Color").copied()),
    rarity:       text("Rarity"),
    cost:         safe_int(ext.get("Cost").copied()),
    power:        safe_int(ext.get("Power").copied()),
    life:         safe_int(ext.get("Life").copied()),
    attribute:    text("Attribute"),
    subtypes:     split_list(ext.get("Subtypes").copied()),
    counter_plus: safe_int(ext.get("Counterplus").copied()),
    tags:         extract_tags(description.as_deref().unwrap_or_default()),
    description,
    is_alt_art:   flags.is_alt_art,
    is_manga:     flags.is_manga,
    is_sp:        flags.is_sp,
    url:          raw.url,
    image_url:    raw.image_url,
    name:         raw.name,
    synced_at,
  }
}
