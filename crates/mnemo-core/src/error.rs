//! Error types for `mnemo-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The self-rated recall score was outside the accepted range.
  #[error("invalid quality rating {0}, expected 0..=5")]
  InvalidQuality(i32),

  /// The pair has no progress row; the initializer must run first.
  /// Reviews never create scheduling state implicitly.
  #[error("no progress for user {user_id} card {card_id}")]
  ProgressNotFound { user_id: Uuid, card_id: Uuid },

  /// A version-checked write found a newer committed version.
  #[error("progress for user {user_id} card {card_id} was modified concurrently")]
  ConcurrentModification { user_id: Uuid, card_id: Uuid },

  /// An error from the storage backend, propagated unchanged.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
