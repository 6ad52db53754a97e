//! Client for the tcgcsv.com catalog mirror.
//!
//! Implements [`grandline_core::source::CatalogSource`] over three read-only
//! JSON endpoints under a category base URL:
//!
//! | Path | Returns |
//! |------|---------|
//! | `/groups` | every set in the category |
//! | `/{groupId}/products` | products of one set |
//! | `/{groupId}/prices` | current prices of one set |

mod client;

pub mod error;

pub use client::{DEFAULT_BASE_URL, TcgcsvClient, TcgcsvConfig};
pub use error::{Error, Result};
