//! Core types and scheduling logic for mnemo, a spaced-repetition service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod card;
pub mod error;
pub mod event;
pub mod progress;
pub mod scheduler;
pub mod service;
pub mod store;

pub use error::{Error, Result};
