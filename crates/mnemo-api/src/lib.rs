//! JSON REST API for mnemo.
//!
//! Exposes an axum [`Router`] backed by any store implementing the core
//! traits. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", mnemo_api::api_router(srs.clone()))
//! ```

pub mod cards;
pub mod error;
pub mod reviews;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use mnemo_core::{
  service::Srs,
  store::{CardCatalog, ProgressStore},
};

pub use error::ApiError;

/// Build a fully-materialised API router for `srs`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(srs: Arc<Srs<S>>) -> Router<()>
where
  S: ProgressStore + CardCatalog + 'static,
{
  Router::new()
    // Catalog
    .route("/cards", get(cards::list::<S>).post(cards::create::<S>))
    .route("/cards/{id}", get(cards::get_one::<S>))
    // Scheduling
    .route("/users/{user_id}/initialize", post(reviews::initialize::<S>))
    .route("/users/{user_id}/due", get(reviews::due::<S>))
    .route("/users/{user_id}/reviews", post(reviews::submit::<S>))
    .route(
      "/users/{user_id}/progress/{card_id}",
      get(reviews::progress::<S>),
    )
    .route(
      "/users/{user_id}/progress/{card_id}/events",
      get(reviews::events::<S>),
    )
    .with_state(srs)
}
