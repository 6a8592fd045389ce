//! Core types and trait definitions for the Folio content store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It defines the document model, the typed resource schemas decoded at the
//! read boundary, and the traits that storage backends and external services
//! implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod credentials;
pub mod document;
pub mod error;
pub mod presence;
pub mod remote;
pub mod resource;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
