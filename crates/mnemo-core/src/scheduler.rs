//! The pure SM-2 transition function.
//!
//! [`Scheduler::review`] maps the current [`Progress`] and a quality
//! rating to the next state. No I/O and no clock access — the caller
//! supplies `now` — so every property of the algorithm is testable
//! without a store. Persisting the result and appending the review event
//! belong to [`crate::service::Srs`].

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  progress::{CardStatus, Progress},
};

// ─── Quality ─────────────────────────────────────────────────────────────────

/// A validated self-rated recall score: 0 (total failure) to 5 (perfect
/// recall).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
  pub const MAX: i32 = 5;
  pub const MIN: i32 = 0;

  /// Rejects anything outside `0..=5` before any state is touched.
  pub fn new(raw: i32) -> Result<Self> {
    if (Self::MIN..=Self::MAX).contains(&raw) {
      Ok(Self(raw as u8))
    } else {
      Err(Error::InvalidQuality(raw))
    }
  }

  pub fn value(self) -> u8 { self.0 }

  /// Quality >= 3 counts as a successful recall; anything lower is a
  /// lapse.
  pub fn is_success(self) -> bool { self.0 >= 3 }
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Tunable scheduling constants. Defaults are the classic SM-2 / Anki
/// values; the server config file can override any of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
  /// Ease assigned to a freshly initialized card.
  pub initial_ease:          f64,
  /// Hard floor for the ease factor.
  pub min_ease:              f64,
  /// Subtracted from the ease factor on every lapse.
  pub lapse_ease_penalty:    f64,
  /// Interval after the first successful review.
  pub first_interval_days:   u32,
  /// Interval after the second consecutive success.
  pub second_interval_days:  u32,
  /// Interval a lapsed card is rescheduled at.
  pub relearn_interval_days: u32,
  /// Interval at which a card counts as mature. The available sources
  /// disagree on the exact cutoff, so it stays configurable.
  pub mature_interval_days:  u32,
}

impl Default for SchedulerConfig {
  fn default() -> Self {
    Self {
      initial_ease:          2.5,
      min_ease:              1.3,
      lapse_ease_penalty:    0.2,
      first_interval_days:   1,
      second_interval_days:  6,
      relearn_interval_days: 1,
      mature_interval_days:  21,
    }
  }
}

// ─── Scheduler ───────────────────────────────────────────────────────────────

/// The SM-2 scheduling engine. Stateless apart from its configuration;
/// cheap to clone and share.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
  config: SchedulerConfig,
}

impl Scheduler {
  pub fn new(config: SchedulerConfig) -> Self { Self { config } }

  pub fn config(&self) -> &SchedulerConfig { &self.config }

  /// The row a card starts from: never reviewed, `next_review` an hour
  /// in the past so it is immediately due.
  pub fn seed_progress(
    &self,
    user_id: Uuid,
    card_id: Uuid,
    now: DateTime<Utc>,
  ) -> Progress {
    Progress {
      user_id,
      card_id,
      ease_factor:     self.config.initial_ease,
      interval_days:   0,
      repetitions:     0,
      last_reviewed:   None,
      next_review:     now - Duration::hours(1),
      total_reviews:   0,
      correct_reviews: 0,
      streak:          0,
      status:          CardStatus::New,
      version:         0,
    }
  }

  /// Pure SM-2 transition: current state + rating → next state.
  ///
  /// On success the interval follows the fixed 1-day / 6-day steps for
  /// the first two repetitions, then grows by the ease factor carried
  /// into this review; the ease update is applied afterwards. On a lapse
  /// repetitions and streak reset, the interval drops to the relearn
  /// value, and the ease factor takes the lapse penalty. The ease factor
  /// never leaves `[min_ease, ∞)` in either branch.
  pub fn review(
    &self,
    progress: &Progress,
    quality: Quality,
    now: DateTime<Utc>,
  ) -> Progress {
    let cfg = &self.config;
    let mut next = progress.clone();

    if quality.is_success() {
      next.repetitions += 1;
      next.streak += 1;
      next.correct_reviews += 1;
      next.interval_days = match next.repetitions {
        1 => cfg.first_interval_days,
        2 => cfg.second_interval_days,
        _ => (f64::from(progress.interval_days) * progress.ease_factor).round() as u32,
      };
      let q = f64::from(quality.value());
      next.ease_factor = (progress.ease_factor
        + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)))
        .max(cfg.min_ease);
    } else {
      next.repetitions = 0;
      next.streak = 0;
      next.interval_days = cfg.relearn_interval_days;
      next.ease_factor = (progress.ease_factor - cfg.lapse_ease_penalty).max(cfg.min_ease);
    }

    next.total_reviews += 1;
    next.last_reviewed = Some(now);
    next.next_review = now + Duration::days(i64::from(next.interval_days));
    next.status =
      CardStatus::derive(next.repetitions, next.interval_days, cfg.mature_interval_days);

    next
  }
}
