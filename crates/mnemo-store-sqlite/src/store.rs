//! [`SqliteStore`] — the SQLite implementation of the mnemo store traits.

use std::path::Path;

use chrono::{DateTime, Utc};
use mnemo_core::{
  card::{Card, NewCard},
  event::ReviewEvent,
  progress::Progress,
  store::{CardCatalog, ProgressStore},
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawCard, RawEvent, RawProgress, encode_dt, encode_status, encode_uuid,
  },
  schema::SCHEMA,
};

const PROGRESS_COLUMNS: &str = "user_id, card_id, ease_factor, interval_days, repetitions, \
   last_reviewed, next_review, total_reviews, correct_reviews, streak, status, version";

fn progress_from_row(row: &rusqlite::Row) -> rusqlite::Result<RawProgress> {
  Ok(RawProgress {
    user_id:         row.get(0)?,
    card_id:         row.get(1)?,
    ease_factor:     row.get(2)?,
    interval_days:   row.get(3)?,
    repetitions:     row.get(4)?,
    last_reviewed:   row.get(5)?,
    next_review:     row.get(6)?,
    total_reviews:   row.get(7)?,
    correct_reviews: row.get(8)?,
    streak:          row.get(9)?,
    status:          row.get(10)?,
    version:         row.get(11)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A mnemo store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ProgressStore impl ──────────────────────────────────────────────────────

impl ProgressStore for SqliteStore {
  type Error = Error;

  async fn get_progress(&self, user_id: Uuid, card_id: Uuid) -> Result<Option<Progress>> {
    let user_str = encode_uuid(user_id);
    let card_str = encode_uuid(card_id);

    let raw: Option<RawProgress> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PROGRESS_COLUMNS} FROM progress WHERE user_id = ?1 AND card_id = ?2"
              ),
              rusqlite::params![user_str, card_str],
              progress_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProgress::into_progress).transpose()
  }

  async fn save_progress(&self, progress: Progress, expected_version: i64) -> Result<()> {
    let user_id = progress.user_id;
    let card_id = progress.card_id;

    let user_str          = encode_uuid(user_id);
    let card_str          = encode_uuid(card_id);
    let ease_factor       = progress.ease_factor;
    let interval_days     = i64::from(progress.interval_days);
    let repetitions       = i64::from(progress.repetitions);
    let last_reviewed_str = progress.last_reviewed.map(encode_dt);
    let next_review_str   = encode_dt(progress.next_review);
    let total_reviews     = i64::from(progress.total_reviews);
    let correct_reviews   = i64::from(progress.correct_reviews);
    let streak            = i64::from(progress.streak);
    let status_str        = encode_status(progress.status).to_owned();

    let probe_user = user_str.clone();
    let probe_card = card_str.clone();

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE progress SET
             ease_factor = ?3, interval_days = ?4, repetitions = ?5,
             last_reviewed = ?6, next_review = ?7, total_reviews = ?8,
             correct_reviews = ?9, streak = ?10, status = ?11,
             version = version + 1
           WHERE user_id = ?1 AND card_id = ?2 AND version = ?12",
          rusqlite::params![
            user_str,
            card_str,
            ease_factor,
            interval_days,
            repetitions,
            last_reviewed_str,
            next_review_str,
            total_reviews,
            correct_reviews,
            streak,
            status_str,
            expected_version,
          ],
        )?)
      })
      .await?;

    if affected == 1 {
      return Ok(());
    }

    // Zero rows: either the pair was never initialized or another writer
    // committed a newer version.
    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM progress WHERE user_id = ?1 AND card_id = ?2",
              rusqlite::params![probe_user, probe_card],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    if exists {
      Err(Error::Conflict { user_id, card_id })
    } else {
      Err(Error::ProgressNotFound { user_id, card_id })
    }
  }

  async fn insert_progress_if_absent(&self, progress: Progress) -> Result<bool> {
    let user_str          = encode_uuid(progress.user_id);
    let card_str          = encode_uuid(progress.card_id);
    let ease_factor       = progress.ease_factor;
    let interval_days     = i64::from(progress.interval_days);
    let repetitions       = i64::from(progress.repetitions);
    let last_reviewed_str = progress.last_reviewed.map(encode_dt);
    let next_review_str   = encode_dt(progress.next_review);
    let total_reviews     = i64::from(progress.total_reviews);
    let correct_reviews   = i64::from(progress.correct_reviews);
    let streak            = i64::from(progress.streak);
    let status_str        = encode_status(progress.status).to_owned();
    let version           = progress.version;

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO progress (
             user_id, card_id, ease_factor, interval_days, repetitions,
             last_reviewed, next_review, total_reviews, correct_reviews,
             streak, status, version
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            user_str,
            card_str,
            ease_factor,
            interval_days,
            repetitions,
            last_reviewed_str,
            next_review_str,
            total_reviews,
            correct_reviews,
            streak,
            status_str,
            version,
          ],
        )?)
      })
      .await?;

    Ok(affected == 1)
  }

  async fn query_due(
    &self,
    user_id: Uuid,
    now: DateTime<Utc>,
    limit: usize,
  ) -> Result<Vec<Progress>> {
    let user_str = encode_uuid(user_id);
    let now_str  = encode_dt(now);
    let limit    = limit as i64;

    let raws: Vec<RawProgress> = self
      .conn
      .call(move |conn| {
        // ORDER BY mirrors mnemo_core::progress::due_order.
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROGRESS_COLUMNS} FROM progress
           WHERE user_id = ?1 AND next_review <= ?2
           ORDER BY next_review ASC, ease_factor ASC
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, now_str, limit], progress_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProgress::into_progress).collect()
  }

  async fn append_event(&self, event: ReviewEvent) -> Result<()> {
    let event_id_str    = encode_uuid(event.event_id);
    let user_str        = encode_uuid(event.user_id);
    let card_str        = encode_uuid(event.card_id);
    let quality         = i64::from(event.quality);
    let time_to_answer  = event.time_to_answer_secs.map(i64::from);
    let recorded_at_str = encode_dt(event.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO review_events (
             event_id, user_id, card_id, quality, time_to_answer_secs, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            event_id_str,
            user_str,
            card_str,
            quality,
            time_to_answer,
            recorded_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_events(&self, user_id: Uuid, card_id: Uuid) -> Result<Vec<ReviewEvent>> {
    let user_str = encode_uuid(user_id);
    let card_str = encode_uuid(card_id);

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_id, user_id, card_id, quality, time_to_answer_secs, recorded_at
           FROM review_events
           WHERE user_id = ?1 AND card_id = ?2
           ORDER BY recorded_at ASC, rowid ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, card_str], |row| {
            Ok(RawEvent {
              event_id:            row.get(0)?,
              user_id:             row.get(1)?,
              card_id:             row.get(2)?,
              quality:             row.get(3)?,
              time_to_answer_secs: row.get(4)?,
              recorded_at:         row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }
}

// ─── CardCatalog impl ────────────────────────────────────────────────────────

impl CardCatalog for SqliteStore {
  type Error = Error;

  async fn add_card(&self, input: NewCard) -> Result<Card> {
    let card = Card {
      card_id:    Uuid::new_v4(),
      prompt:     input.prompt,
      answer:     input.answer,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(card.card_id);
    let prompt     = card.prompt.clone();
    let answer     = card.answer.clone();
    let created_at = encode_dt(card.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cards (card_id, prompt, answer, created_at) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, prompt, answer, created_at],
        )?;
        Ok(())
      })
      .await?;

    Ok(card)
  }

  async fn get_card(&self, card_id: Uuid) -> Result<Option<Card>> {
    let id_str = encode_uuid(card_id);

    let raw: Option<RawCard> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT card_id, prompt, answer, created_at FROM cards WHERE card_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawCard {
                  card_id:    row.get(0)?,
                  prompt:     row.get(1)?,
                  answer:     row.get(2)?,
                  created_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCard::into_card).transpose()
  }

  async fn list_card_ids(&self) -> Result<Vec<Uuid>> {
    let raw_ids: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT card_id FROM cards ORDER BY rowid ASC")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raw_ids.iter().map(|s| crate::encode::decode_uuid(s)).collect()
  }
}
