//! The storage traits implemented by backends (e.g. `mnemo-store-sqlite`).
//!
//! Higher layers (`mnemo-api`, the review service) depend on these
//! abstractions, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  card::{Card, NewCard},
  event::ReviewEvent,
  progress::Progress,
};

// ─── Progress store ──────────────────────────────────────────────────────────

/// Abstraction over the progress store.
///
/// Progress rows are mutated only through [`save_progress`]'s
/// version-checked write; review events are strictly append-only.
///
/// The associated error must convert into [`crate::Error`] so the review
/// service can tell a lost optimistic race (retryable) apart from a
/// storage failure (propagated).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
///
/// [`save_progress`]: ProgressStore::save_progress
pub trait ProgressStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Fetch the progress row for a pair. `None` if never initialized.
  fn get_progress(
    &self,
    user_id: Uuid,
    card_id: Uuid,
  ) -> impl Future<Output = Result<Option<Progress>, Self::Error>> + Send + '_;

  /// Version-checked write: commits only if the stored version still
  /// equals `expected_version`, and bumps it by one on commit.
  ///
  /// Fails with (a conversion to) [`crate::Error::ConcurrentModification`]
  /// when another writer committed first, and with
  /// [`crate::Error::ProgressNotFound`] when the row does not exist.
  fn save_progress(
    &self,
    progress: Progress,
    expected_version: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert a seed row unless the pair already has one. Returns whether
  /// a row was written. Must be safe under concurrent duplicate calls.
  fn insert_progress_if_absent(
    &self,
    progress: Progress,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All rows for `user_id` with `next_review <= now`, in the order
  /// defined by [`crate::progress::due_order`], truncated to `limit`.
  fn query_due(
    &self,
    user_id: Uuid,
    now: DateTime<Utc>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Progress>, Self::Error>> + Send + '_;

  /// Append one review event. Events are never updated or deleted.
  fn append_event(
    &self,
    event: ReviewEvent,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Event history for a pair, oldest first.
  fn list_events(
    &self,
    user_id: Uuid,
    card_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ReviewEvent>, Self::Error>> + Send + '_;
}

// ─── Card catalog ────────────────────────────────────────────────────────────

/// Read-mostly card catalog. Content is immutable once created; the
/// scheduler only ever consumes the ID list.
pub trait CardCatalog: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Create and persist a card. The id and `created_at` are assigned by
  /// the store.
  fn add_card(
    &self,
    input: NewCard,
  ) -> impl Future<Output = Result<Card, Self::Error>> + Send + '_;

  /// Retrieve a card by id. `None` if not found.
  fn get_card(
    &self,
    card_id: Uuid,
  ) -> impl Future<Output = Result<Option<Card>, Self::Error>> + Send + '_;

  /// Every card id in the catalog — the initializer's ID source.
  fn list_card_ids(
    &self,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;
}
