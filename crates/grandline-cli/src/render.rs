//! Plain-text rendering of API responses.

use std::fmt::Write as _;

use grandline_core::{
  price::PriceResult, product::CardResult, source::UpstreamGroup, sync::SyncReport,
};

fn money(value: Option<f64>) -> String {
  value.map_or_else(|| "-".to_string(), |v| format!("${v:.2}"))
}

pub fn groups(groups: &[UpstreamGroup]) -> String {
  let width = groups
    .iter()
    .map(|g| g.abbreviation.len())
    .max()
    .unwrap_or(0)
    .max(4);
  let mut out = String::new();
  for g in groups {
    let _ = writeln!(out, "{:<width$}  {:>6}  {}", g.abbreviation, g.group_id, g.name);
  }
  out
}

fn price_line(p: &PriceResult) -> String {
  format!(
    "    {:<10} market {:>8}  low {:>8}  mid {:>8}  high {:>8}  ({})",
    p.sub_type_name,
    money(p.market_price),
    money(p.low_price),
    money(p.mid_price),
    money(p.high_price),
    p.recorded_at.format("%Y-%m-%d"),
  )
}

pub fn cards(cards: &[CardResult]) -> String {
  let mut out = String::new();
  for c in cards {
    let number = c.card_number.as_deref().unwrap_or("?");
    let _ = write!(out, "{number}  {}", c.name);
    if let Some(rarity) = &c.rarity {
      let _ = write!(out, "  [{rarity}]");
    }
    out.push('\n');

    let mut stats = Vec::new();
    if let Some(t) = &c.card_type {
      stats.push(t.clone());
    }
    if !c.colors.is_empty() {
      stats.push(c.colors.join("/"));
    }
    if let Some(cost) = c.cost {
      stats.push(format!("cost {cost}"));
    }
    if let Some(power) = c.power {
      stats.push(format!("power {power}"));
    }
    if let Some(counter) = c.counter_plus {
      stats.push(format!("counter +{counter}"));
    }
    if !stats.is_empty() {
      let _ = writeln!(out, "    {}", stats.join(" · "));
    }
    if !c.tags.is_empty() {
      let _ = writeln!(out, "    {}", c.tags.join(", "));
    }

    if c.prices.is_empty() {
      out.push_str("    no prices\n");
    }
    for p in &c.prices {
      out.push_str(&price_line(p));
      out.push('\n');
    }
  }
  out
}

pub fn sync_report(report: &SyncReport) -> String {
  if report.skipped {
    return "fresh, skipped".to_string();
  }
  format!(
    "{}: {} products, {} prices",
    report.group.as_deref().unwrap_or("synced"),
    report.products_upserted.unwrap_or(0),
    report.prices_inserted.unwrap_or(0),
  )
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  #[test]
  fn money_formats_two_places() {
    assert_eq!(money(Some(0.1)), "$0.10");
    assert_eq!(money(None), "-");
  }

  #[test]
  fn card_lists_every_price_variant() {
    let card = CardResult {
      product_id:   1,
      name:         "Nefeltari Vivi".into(),
      card_number:  Some("EB03-001".into()),
      card_type:    Some("Leader".into()),
      colors:       vec!["Blue".into(), "Purple".into()],
      rarity:       Some("L".into()),
      cost:         None,
      power:        Some(5000),
      counter_plus: None,
      tags:         vec!["Activate: Main".into()],
      is_alt_art:   false,
      is_manga:     false,
      is_sp:        false,
      url:          None,
      image_url:    None,
      prices:       vec![
        PriceResult {
          sub_type_name: "Normal".into(),
          market_price:  Some(1.5),
          low_price:     None,
          mid_price:     None,
          high_price:    None,
          recorded_at:   Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
        },
        PriceResult {
          sub_type_name: "Foil".into(),
          market_price:  None,
          low_price:     Some(3.0),
          mid_price:     None,
          high_price:    None,
          recorded_at:   Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
        },
      ],
    };
    let out = cards(&[card]);
    assert!(out.starts_with("EB03-001  Nefeltari Vivi  [L]\n"), "{out}");
    assert!(out.contains("Leader · Blue/Purple · power 5000"), "{out}");
    assert!(out.contains("Normal     market    $1.50"), "{out}");
    assert!(out.contains("low    $3.00"), "{out}");
    assert!(out.contains("(2026-10-01)"), "{out}");
  }

  #[test]
  fn sync_report_summaries() {
    assert_eq!(sync_report(&SyncReport::skipped()), "fresh, skipped");
    let report = SyncReport {
      skipped:           false,
      group:             Some("Romance Dawn".into()),
      products_upserted: Some(154),
      prices_inserted:   Some(201),
    };
    assert_eq!(sync_report(&report), "Romance Dawn: 154 products, 201 prices");
  }
}
