//! The review service — the transactional wrapper around the pure engine.
//!
//! [`Srs`] owns a [`Scheduler`] and a store. It is the only place that
//! sequences read → compute → version-checked write → event append, and
//! the only place that retries lost optimistic races.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  event::{ReviewEvent, ReviewStats},
  progress::{DueCard, Progress},
  scheduler::{Quality, Scheduler},
  store::{CardCatalog, ProgressStore},
};

/// Save attempts per review before a lost race is surfaced to the caller.
const MAX_SAVE_ATTEMPTS: u32 = 3;

pub struct Srs<S> {
  scheduler: Scheduler,
  store:     S,
}

impl<S> Srs<S> {
  pub fn new(scheduler: Scheduler, store: S) -> Self { Self { scheduler, store } }

  pub fn scheduler(&self) -> &Scheduler { &self.scheduler }

  pub fn store(&self) -> &S { &self.store }
}

impl<S: ProgressStore> Srs<S> {
  /// Apply one review to a pair and commit it.
  ///
  /// The quality rating is validated before anything is read. The current
  /// row is fetched (`ProgressNotFound` if the pair was never initialized
  /// — reviews never create state implicitly), run through the pure
  /// engine, and written back against the version that was read. If a
  /// concurrent review commits first, the row is re-read and the engine
  /// re-run against the fresh state, up to [`MAX_SAVE_ATTEMPTS`] times.
  /// The review event is appended only after the write commits, so the
  /// log never records a review that lost its race.
  pub async fn submit_review(
    &self,
    user_id: Uuid,
    card_id: Uuid,
    quality: i32,
    time_to_answer_secs: Option<u32>,
    now: DateTime<Utc>,
  ) -> Result<Progress> {
    let quality = Quality::new(quality)?;

    let mut attempt = 1;
    loop {
      let current = self
        .store
        .get_progress(user_id, card_id)
        .await
        .map_err(Into::into)?
        .ok_or(Error::ProgressNotFound { user_id, card_id })?;

      let updated = self.scheduler.review(&current, quality, now);

      match self.store.save_progress(updated.clone(), current.version).await {
        Ok(()) => {
          let mut committed = updated;
          committed.version = current.version + 1;

          self
            .store
            .append_event(ReviewEvent {
              event_id: Uuid::new_v4(),
              user_id,
              card_id,
              quality: quality.value(),
              time_to_answer_secs,
              recorded_at: now,
            })
            .await
            .map_err(Into::into)?;

          return Ok(committed);
        }
        Err(e) => {
          let err: Error = e.into();
          match err {
            Error::ConcurrentModification { .. } if attempt < MAX_SAVE_ATTEMPTS => {
              tracing::debug!(%user_id, %card_id, attempt, "review lost optimistic race, retrying");
              attempt += 1;
            }
            other => return Err(other),
          }
        }
      }
    }
  }

  /// The current progress row for a pair.
  pub async fn progress(&self, user_id: Uuid, card_id: Uuid) -> Result<Progress> {
    self
      .store
      .get_progress(user_id, card_id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::ProgressNotFound { user_id, card_id })
  }

  /// Cards due for `user_id` at `now`: earliest first, hardest first
  /// among equally due, at most `limit`. Empty when nothing is due.
  pub async fn due_cards(
    &self,
    user_id: Uuid,
    now: DateTime<Utc>,
    limit: usize,
  ) -> Result<Vec<DueCard>> {
    let rows = self
      .store
      .query_due(user_id, now, limit)
      .await
      .map_err(Into::into)?;
    Ok(rows.iter().map(DueCard::from).collect())
  }

  /// Seed a progress row for every pair in `card_ids` that has none.
  /// Returns how many rows were created; running it again is a no-op.
  pub async fn initialize_missing(
    &self,
    user_id: Uuid,
    card_ids: &[Uuid],
    now: DateTime<Utc>,
  ) -> Result<usize> {
    let mut created = 0;
    for &card_id in card_ids {
      let seed = self.scheduler.seed_progress(user_id, card_id, now);
      if self
        .store
        .insert_progress_if_absent(seed)
        .await
        .map_err(Into::into)?
      {
        created += 1;
      }
    }
    if created > 0 {
      tracing::info!(%user_id, created, "initialized progress rows");
    }
    Ok(created)
  }

  /// Event history for a pair, oldest first, with stats derived from the
  /// log alone.
  pub async fn history(
    &self,
    user_id: Uuid,
    card_id: Uuid,
  ) -> Result<(Vec<ReviewEvent>, ReviewStats)> {
    let events = self
      .store
      .list_events(user_id, card_id)
      .await
      .map_err(Into::into)?;
    let stats = ReviewStats::from_events(&events);
    Ok((events, stats))
  }
}

impl<S: ProgressStore + CardCatalog> Srs<S> {
  /// Initializer convenience: seed every catalog card the user has never
  /// seen.
  pub async fn initialize_from_catalog(
    &self,
    user_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<usize> {
    let ids = self.store.list_card_ids().await.map_err(Into::into)?;
    self.initialize_missing(user_id, &ids, now).await
  }
}
