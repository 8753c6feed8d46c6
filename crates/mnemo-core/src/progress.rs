//! Scheduling state for a `(user, card)` pair and its derived status.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Maturity of a card for one user, derived from
/// `(repetitions, interval_days)`. Recomputed on every transition so the
/// four-state machine has exactly one authoritative implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
  New,
  Learning,
  Young,
  Mature,
}

impl CardStatus {
  /// `mature_threshold` is the interval, in days, at which a card counts
  /// as mature (Anki convention: 21).
  pub fn derive(repetitions: u32, interval_days: u32, mature_threshold: u32) -> Self {
    match repetitions {
      0 => Self::New,
      1 | 2 => Self::Learning,
      _ if interval_days < mature_threshold => Self::Young,
      _ => Self::Mature,
    }
  }
}

// ─── Progress ────────────────────────────────────────────────────────────────

/// One row per `(user_id, card_id)` — the only mutable state in the
/// system. Created once by the initializer, mutated exactly once per
/// committed review through a version-checked write, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
  pub user_id:         Uuid,
  pub card_id:         Uuid,
  /// Interval growth multiplier; never drops below the configured floor.
  pub ease_factor:     f64,
  /// Days until the next review.
  pub interval_days:   u32,
  /// Consecutive successful reviews since the last lapse.
  pub repetitions:     u32,
  /// `None` only before the first review.
  pub last_reviewed:   Option<DateTime<Utc>>,
  /// The sole field the due query filters on.
  pub next_review:     DateTime<Utc>,
  pub total_reviews:   u32,
  pub correct_reviews: u32,
  /// Consecutive successes; reset to 0 on any lapse.
  pub streak:          u32,
  pub status:          CardStatus,
  /// Optimistic-concurrency counter, incremented by the store on every
  /// committed write.
  pub version:         i64,
}

// ─── Due ordering ────────────────────────────────────────────────────────────

/// The ordering contract for due queries: earliest `next_review` first,
/// ties broken by lower `ease_factor` so harder cards surface first among
/// equally-due cards. SQL backends mirror this in their `ORDER BY`; this
/// comparator is the authority for in-memory backends and tests.
pub fn due_order(a: &Progress, b: &Progress) -> Ordering {
  a.next_review
    .cmp(&b.next_review)
    .then_with(|| a.ease_factor.total_cmp(&b.ease_factor))
}

/// What the due selector hands to clients — enough to fetch and render
/// the card without exposing the whole scheduling row.
#[derive(Debug, Clone, Serialize)]
pub struct DueCard {
  pub card_id:     Uuid,
  pub next_review: DateTime<Utc>,
  pub ease_factor: f64,
  pub status:      CardStatus,
}

impl From<&Progress> for DueCard {
  fn from(p: &Progress) -> Self {
    Self {
      card_id:     p.card_id,
      next_review: p.next_review,
      ease_factor: p.ease_factor,
      status:      p.status,
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};
  use uuid::Uuid;

  use super::*;

  #[test]
  fn status_machine() {
    assert_eq!(CardStatus::derive(0, 0, 21), CardStatus::New);
    assert_eq!(CardStatus::derive(1, 1, 21), CardStatus::Learning);
    assert_eq!(CardStatus::derive(2, 6, 21), CardStatus::Learning);
    assert_eq!(CardStatus::derive(3, 16, 21), CardStatus::Young);
    assert_eq!(CardStatus::derive(3, 20, 21), CardStatus::Young);
    assert_eq!(CardStatus::derive(4, 21, 21), CardStatus::Mature);
    assert_eq!(CardStatus::derive(10, 120, 21), CardStatus::Mature);
  }

  #[test]
  fn status_respects_configured_threshold() {
    assert_eq!(CardStatus::derive(3, 15, 10), CardStatus::Mature);
    assert_eq!(CardStatus::derive(3, 15, 30), CardStatus::Young);
  }

  fn row(next_review_offset_days: i64, ease_factor: f64) -> Progress {
    let now = Utc::now();
    Progress {
      user_id:         Uuid::new_v4(),
      card_id:         Uuid::new_v4(),
      ease_factor,
      interval_days:   1,
      repetitions:     1,
      last_reviewed:   Some(now),
      next_review:     now + Duration::days(next_review_offset_days),
      total_reviews:   1,
      correct_reviews: 1,
      streak:          1,
      status:          CardStatus::Learning,
      version:         0,
    }
  }

  #[test]
  fn due_order_earliest_first_then_hardest() {
    let earlier = row(-2, 2.5);
    let later = row(-1, 1.3);
    assert_eq!(due_order(&earlier, &later), Ordering::Less);

    let hard = row(-1, 1.3);
    let mut easy = row(-1, 2.5);
    easy.next_review = hard.next_review;
    assert_eq!(due_order(&hard, &easy), Ordering::Less);
  }
}
