//! Catalog cards — immutable prompt/answer content.
//!
//! The scheduler never looks inside a card; it works with opaque IDs. The
//! type exists so the initializer has an ID source and the API has a
//! minimal create/list surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A flashcard. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
  pub card_id:    Uuid,
  pub prompt:     String,
  pub answer:     String,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::CardCatalog::add_card`]. The id and the
/// timestamp are assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCard {
  pub prompt: String,
  pub answer: String,
}
