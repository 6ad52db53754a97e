//! [`SqliteStore`]: the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use grandline_core::{
  group::Group,
  price::Price,
  product::Product,
  store::{CatalogStore, ProductQuery},
};
use rusqlite::{OptionalExtension as _, types::Value};

use crate::{
  Result,
  encode::{EncodedProduct, RawGroup, RawPrice, RawProduct, contains_pattern, encode_dt},
  schema::SCHEMA,
};

/// Upper bound on ids bound into a single `IN (...)` list.
const IN_CHUNK: usize = 500;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Grandline catalog mirror backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = crate::Error;

  // ── Groups ────────────────────────────────────────────────────────────────

  async fn get_group(&self, group_id: i64) -> Result<Option<Group>> {
    let raw: Option<RawGroup> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM groups WHERE group_id = ?1", RawGroup::COLUMNS),
              rusqlite::params![group_id],
              RawGroup::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGroup::into_group).transpose()
  }

  async fn find_group_by_abbreviation(&self, abbreviation: &str) -> Result<Option<Group>> {
    let abbreviation = abbreviation.to_owned();

    let raw: Option<RawGroup> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM groups
                 WHERE abbreviation = ?1 COLLATE NOCASE
                 ORDER BY group_id
                 LIMIT 1",
                RawGroup::COLUMNS
              ),
              rusqlite::params![abbreviation],
              RawGroup::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGroup::into_group).transpose()
  }

  async fn upsert_group(&self, group: Group) -> Result<()> {
    let synced_at = group.synced_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO groups (group_id, name, abbreviation, synced_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (group_id) DO UPDATE SET
             name         = excluded.name,
             abbreviation = excluded.abbreviation,
             synced_at    = excluded.synced_at",
          rusqlite::params![group.group_id, group.name, group.abbreviation, synced_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Products ──────────────────────────────────────────────────────────────

  async fn upsert_products(&self, products: Vec<Product>) -> Result<usize> {
    let encoded = products
      .into_iter()
      .map(EncodedProduct::new)
      .collect::<Result<Vec<_>>>()?;

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut written = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO products (
               product_id, group_id, name, clean_name, card_number, card_type,
               colors, rarity, cost, power, life, attribute, subtypes,
               counter_plus, description, tags, is_alt_art, is_manga, is_sp,
               url, image_url, synced_at
             ) VALUES (
               ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
               ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22
             )
             ON CONFLICT (product_id) DO UPDATE SET
               group_id     = excluded.group_id,
               name         = excluded.name,
               clean_name   = excluded.clean_name,
               card_number  = excluded.card_number,
               card_type    = excluded.card_type,
               colors       = excluded.colors,
               rarity       = excluded.rarity,
               cost         = excluded.cost,
               power        = excluded.power,
               life         = excluded.life,
               attribute    = excluded.attribute,
               subtypes     = excluded.subtypes,
               counter_plus = excluded.counter_plus,
               description  = excluded.description,
               tags         = excluded.tags,
               is_alt_art   = excluded.is_alt_art,
               is_manga     = excluded.is_manga,
               is_sp        = excluded.is_sp,
               url          = excluded.url,
               image_url    = excluded.image_url,
               synced_at    = excluded.synced_at",
          )?;

          for e in &encoded {
            let p = &e.product;
            written += stmt.execute(rusqlite::params![
              p.product_id,
              p.group_id,
              p.name,
              p.clean_name,
              p.card_number,
              p.card_type,
              e.colors,
              p.rarity,
              p.cost,
              p.power,
              p.life,
              p.attribute,
              e.subtypes,
              p.counter_plus,
              p.description,
              e.tags,
              p.is_alt_art,
              p.is_manga,
              p.is_sp,
              p.url,
              p.image_url,
              e.synced_at,
            ])?;
          }
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;

    tracing::debug!(written, "products upserted");
    Ok(written)
  }

  async fn find_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
    // Build WHERE clause dynamically; parameters bind positionally.
    let mut conds: Vec<&'static str> = vec![];
    let mut params: Vec<Value> = vec![];
    if let Some(number) = &query.card_number {
      conds.push("card_number = ? COLLATE NOCASE");
      params.push(Value::Text(number.clone()));
    }
    if let Some(name) = &query.name {
      conds.push("name LIKE ? ESCAPE '\\'");
      params.push(Value::Text(contains_pattern(name)));
    }
    if let Some(group_id) = query.group_id {
      conds.push("group_id = ?");
      params.push(Value::Integer(group_id));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };

    let sql = format!(
      "SELECT {} FROM products {where_clause} ORDER BY product_id",
      RawProduct::COLUMNS
    );

    let raws: Vec<RawProduct> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawProduct::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProduct::into_product).collect()
  }

  // ── Prices (append-only) ──────────────────────────────────────────────────

  async fn insert_prices(&self, prices: Vec<Price>) -> Result<usize> {
    let rows: Vec<(Price, String)> = prices
      .into_iter()
      .map(|p| {
        let at = encode_dt(p.recorded_at);
        (p, at)
      })
      .collect();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO prices (
               product_id, sub_type_name, low_price, mid_price, high_price,
               market_price, recorded_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          )?;
          for (p, at) in &rows {
            inserted += stmt.execute(rusqlite::params![
              p.product_id,
              p.sub_type_name,
              p.low_price,
              p.mid_price,
              p.high_price,
              p.market_price,
              at,
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    tracing::debug!(inserted, "prices appended");
    Ok(inserted)
  }

  async fn prices_for_products(&self, product_ids: &[i64]) -> Result<Vec<Price>> {
    if product_ids.is_empty() {
      return Ok(Vec::new());
    }
    let ids = product_ids.to_vec();

    // Every row of one product lands in the same chunk, so per-product order
    // survives concatenating the chunks.
    let raws: Vec<RawPrice> = self
      .conn
      .call(move |conn| {
        let mut rows = Vec::new();
        for chunk in ids.chunks(IN_CHUNK) {
          let placeholders = vec!["?"; chunk.len()].join(", ");
          let sql = format!(
            "SELECT {} FROM prices
             WHERE product_id IN ({placeholders})
             ORDER BY recorded_at DESC, price_id DESC",
            RawPrice::COLUMNS
          );
          let mut stmt = conn.prepare(&sql)?;
          let chunk_rows = stmt
            .query_map(rusqlite::params_from_iter(chunk.iter()), RawPrice::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows.extend(chunk_rows);
        }
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPrice::into_price).collect()
  }
}
