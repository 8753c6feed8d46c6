//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings (which compare
//! chronologically as text). UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::{DateTime, Utc};
use mnemo_core::{
  card::Card,
  event::ReviewEvent,
  progress::{CardStatus, Progress},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── CardStatus ──────────────────────────────────────────────────────────────

pub fn encode_status(s: CardStatus) -> &'static str {
  match s {
    CardStatus::New => "new",
    CardStatus::Learning => "learning",
    CardStatus::Young => "young",
    CardStatus::Mature => "mature",
  }
}

pub fn decode_status(s: &str) -> Result<CardStatus> {
  match s {
    "new" => Ok(CardStatus::New),
    "learning" => Ok(CardStatus::Learning),
    "young" => Ok(CardStatus::Young),
    "mature" => Ok(CardStatus::Mature),
    other => Err(Error::Corrupt(format!("unknown card status: {other:?}"))),
  }
}

// ─── Integer narrowing ───────────────────────────────────────────────────────

fn decode_u32(value: i64, column: &str) -> Result<u32> {
  u32::try_from(value)
    .map_err(|_| Error::Corrupt(format!("{column} out of range: {value}")))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `progress` row as read from SQLite, before domain decoding.
pub struct RawProgress {
  pub user_id:         String,
  pub card_id:         String,
  pub ease_factor:     f64,
  pub interval_days:   i64,
  pub repetitions:     i64,
  pub last_reviewed:   Option<String>,
  pub next_review:     String,
  pub total_reviews:   i64,
  pub correct_reviews: i64,
  pub streak:          i64,
  pub status:          String,
  pub version:         i64,
}

impl RawProgress {
  pub fn into_progress(self) -> Result<Progress> {
    Ok(Progress {
      user_id:         decode_uuid(&self.user_id)?,
      card_id:         decode_uuid(&self.card_id)?,
      ease_factor:     self.ease_factor,
      interval_days:   decode_u32(self.interval_days, "interval_days")?,
      repetitions:     decode_u32(self.repetitions, "repetitions")?,
      last_reviewed:   self.last_reviewed.as_deref().map(decode_dt).transpose()?,
      next_review:     decode_dt(&self.next_review)?,
      total_reviews:   decode_u32(self.total_reviews, "total_reviews")?,
      correct_reviews: decode_u32(self.correct_reviews, "correct_reviews")?,
      streak:          decode_u32(self.streak, "streak")?,
      status:          decode_status(&self.status)?,
      version:         self.version,
    })
  }
}

/// A `cards` row as read from SQLite.
pub struct RawCard {
  pub card_id:    String,
  pub prompt:     String,
  pub answer:     String,
  pub created_at: String,
}

impl RawCard {
  pub fn into_card(self) -> Result<Card> {
    Ok(Card {
      card_id:    decode_uuid(&self.card_id)?,
      prompt:     self.prompt,
      answer:     self.answer,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// A `review_events` row as read from SQLite.
pub struct RawEvent {
  pub event_id:            String,
  pub user_id:             String,
  pub card_id:             String,
  pub quality:             i64,
  pub time_to_answer_secs: Option<i64>,
  pub recorded_at:         String,
}

impl RawEvent {
  pub fn into_event(self) -> Result<ReviewEvent> {
    let quality = u8::try_from(self.quality)
      .map_err(|_| Error::Corrupt(format!("quality out of range: {}", self.quality)))?;
    Ok(ReviewEvent {
      event_id:            decode_uuid(&self.event_id)?,
      user_id:             decode_uuid(&self.user_id)?,
      card_id:             decode_uuid(&self.card_id)?,
      quality,
      time_to_answer_secs: self
        .time_to_answer_secs
        .map(|v| decode_u32(v, "time_to_answer_secs"))
        .transpose()?,
      recorded_at:         decode_dt(&self.recorded_at)?,
    })
  }
}
