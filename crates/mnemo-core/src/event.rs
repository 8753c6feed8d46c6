//! Review events — the append-only audit log.
//!
//! One event per committed review, never updated or deleted. Streaks and
//! accuracy can be rebuilt from these alone, independent of the mutable
//! [`Progress`](crate::progress::Progress) counters, which keeps the
//! counters auditable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One review as it happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEvent {
  pub event_id:            Uuid,
  pub user_id:             Uuid,
  pub card_id:             Uuid,
  pub quality:             u8,
  /// Seconds between the prompt being shown and the answer, when the
  /// client measured it.
  pub time_to_answer_secs: Option<u32>,
  pub recorded_at:         DateTime<Utc>,
}

impl ReviewEvent {
  pub fn is_success(&self) -> bool { self.quality >= 3 }
}

/// Aggregates derived purely from the event log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReviewStats {
  pub total:    u32,
  pub correct:  u32,
  /// `correct / total`, or 0.0 before the first review.
  pub accuracy: f64,
  /// Consecutive successes counted back from the latest event.
  pub streak:   u32,
}

impl ReviewStats {
  /// `events` must be ordered oldest-first, as returned by
  /// [`crate::store::ProgressStore::list_events`].
  pub fn from_events(events: &[ReviewEvent]) -> Self {
    let total = events.len() as u32;
    let correct = events.iter().filter(|e| e.is_success()).count() as u32;
    let streak = events.iter().rev().take_while(|e| e.is_success()).count() as u32;
    let accuracy = if total == 0 {
      0.0
    } else {
      f64::from(correct) / f64::from(total)
    };
    Self { total, correct, accuracy, streak }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn event(quality: u8) -> ReviewEvent {
    ReviewEvent {
      event_id:            Uuid::new_v4(),
      user_id:             Uuid::new_v4(),
      card_id:             Uuid::new_v4(),
      quality,
      time_to_answer_secs: Some(4),
      recorded_at:         Utc::now(),
    }
  }

  #[test]
  fn stats_of_empty_log() {
    let stats = ReviewStats::from_events(&[]);
    assert_eq!(stats.total, 0);
    assert_eq!(stats.correct, 0);
    assert_eq!(stats.accuracy, 0.0);
    assert_eq!(stats.streak, 0);
  }

  #[test]
  fn streak_counts_back_from_latest() {
    let log: Vec<_> = [5, 1, 4, 3].into_iter().map(event).collect();
    let stats = ReviewStats::from_events(&log);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.correct, 3);
    assert_eq!(stats.streak, 2);
    assert!((stats.accuracy - 0.75).abs() < 1e-9);
  }

  #[test]
  fn streak_is_zero_after_trailing_lapse() {
    let log: Vec<_> = [5, 5, 2].into_iter().map(event).collect();
    assert_eq!(ReviewStats::from_events(&log).streak, 0);
  }
}
