//! Error type for `mnemo-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column value does not fit the domain type (e.g. a negative
  /// interval or an unknown status string).
  #[error("corrupt column value: {0}")]
  Corrupt(String),

  /// No progress row for the pair; the initializer has not run.
  #[error("no progress for user {user_id} card {card_id}")]
  ProgressNotFound { user_id: Uuid, card_id: Uuid },

  /// A version-checked write found a newer committed version.
  #[error("progress for user {user_id} card {card_id} was modified concurrently")]
  Conflict { user_id: Uuid, card_id: Uuid },
}

impl From<Error> for mnemo_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::ProgressNotFound { user_id, card_id } => {
        Self::ProgressNotFound { user_id, card_id }
      }
      Error::Conflict { user_id, card_id } => {
        Self::ConcurrentModification { user_id, card_id }
      }
      other => Self::Storage(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
