//! Error types for `grandline-core`.
//!
//! Lower layers box their own errors into [`Error::Store`],
//! [`Error::StoreWrite`] or [`Error::Upstream`]. Callers classify on the
//! variant; the rendered messages keep the prefixes clients already match on
//! (`Set not found: ...`, `Products upsert failed: ...`).

use thiserror::Error;

/// A boxed error from a store backend or upstream client.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// No group matches the abbreviation, upstream or locally.
  #[error("Set not found: {0}")]
  SetNotFound(String),

  #[error("upstream fetch failed: {0}")]
  Upstream(#[source] BoxError),

  /// A write against the store failed; `op` names the write.
  #[error("{op} failed: {source}")]
  StoreWrite {
    op:     &'static str,
    #[source]
    source: BoxError,
  },

  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

impl Error {
  pub fn upstream<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Upstream(Box::new(e))
  }

  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub fn store_write<E>(op: &'static str, e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StoreWrite { op, source: Box::new(e) }
  }

  pub fn is_set_not_found(&self) -> bool { matches!(self, Self::SetNotFound(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
