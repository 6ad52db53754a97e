//! SQL schema for the Grandline SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS groups (
    group_id      INTEGER PRIMARY KEY,   -- upstream-assigned
    name          TEXT NOT NULL,
    abbreviation  TEXT NOT NULL,
    synced_at     TEXT                   -- RFC 3339 UTC; NULL until first sync
);

CREATE TABLE IF NOT EXISTS products (
    product_id    INTEGER PRIMARY KEY,   -- upstream-assigned
    group_id      INTEGER NOT NULL REFERENCES groups(group_id),
    name          TEXT NOT NULL,
    clean_name    TEXT,
    card_number   TEXT,
    card_type     TEXT,
    colors        TEXT NOT NULL DEFAULT '[]',   -- JSON array
    rarity        TEXT,
    cost          INTEGER,
    power         INTEGER,
    life          INTEGER,
    attribute     TEXT,
    subtypes      TEXT NOT NULL DEFAULT '[]',   -- JSON array
    counter_plus  INTEGER,
    description   TEXT,
    tags          TEXT NOT NULL DEFAULT '[]',   -- JSON array
    is_alt_art    INTEGER NOT NULL DEFAULT 0,
    is_manga      INTEGER NOT NULL DEFAULT 0,
    is_sp         INTEGER NOT NULL DEFAULT 0,
    url           TEXT,
    image_url     TEXT,
    synced_at     TEXT NOT NULL
);

-- Prices are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table. Upstream may price
-- products it does not list, so product_id is not a foreign key.
CREATE TABLE IF NOT EXISTS prices (
    price_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id     INTEGER NOT NULL,
    sub_type_name  TEXT NOT NULL,
    low_price      REAL,
    mid_price      REAL,
    high_price     REAL,
    market_price   REAL,
    recorded_at    TEXT NOT NULL         -- RFC 3339 UTC; fixed width
);

CREATE INDEX IF NOT EXISTS groups_abbreviation_idx ON groups(abbreviation COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS products_group_idx       ON products(group_id);
CREATE INDEX IF NOT EXISTS products_number_idx      ON products(card_number COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS prices_product_idx       ON prices(product_id, recorded_at);

PRAGMA user_version = 1;
";
