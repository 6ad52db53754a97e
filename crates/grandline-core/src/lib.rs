//! Core types and trait definitions for the Grandline catalog mirror.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! store backend (`grandline-store-sqlite`) and the upstream client
//! (`grandline-tcgcsv`) implement the traits defined here; the sync and search
//! routines are written against those traits only.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod attributes;
pub mod error;
pub mod group;
pub mod price;
pub mod product;
pub mod search;
pub mod source;
pub mod store;
pub mod sync;

pub use error::{BoxError, Error, Result};

#[cfg(test)]
mod tests;
