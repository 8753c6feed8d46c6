//! Handlers for the per-user scheduling endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users/:user_id/initialize` | Seed progress for the whole catalog |
//! | `GET`  | `/users/:user_id/due` | Optional `?limit=N`, default 20 |
//! | `POST` | `/users/:user_id/reviews` | Body: [`SubmitBody`]; returns committed progress |
//! | `GET`  | `/users/:user_id/progress/:card_id` | 404 until initialized |
//! | `GET`  | `/users/:user_id/progress/:card_id/events` | History + derived stats |
//!
//! The clock lives here: handlers stamp `Utc::now()` and hand it to the
//! core, which never reads time on its own.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::Utc;
use mnemo_core::{
  event::{ReviewEvent, ReviewStats},
  progress::{DueCard, Progress},
  service::Srs,
  store::{CardCatalog, ProgressStore},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

const DEFAULT_DUE_LIMIT: usize = 20;

// ─── Initialize ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct InitializeResponse {
  pub created: usize,
}

/// `POST /users/:user_id/initialize`
pub async fn initialize<S>(
  State(srs): State<Arc<Srs<S>>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<InitializeResponse>, ApiError>
where
  S: ProgressStore + CardCatalog + 'static,
{
  let created = srs.initialize_from_catalog(user_id, Utc::now()).await?;
  Ok(Json(InitializeResponse { created }))
}

// ─── Due ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DueParams {
  pub limit: Option<usize>,
}

/// `GET /users/:user_id/due[?limit=N]`
pub async fn due<S>(
  State(srs): State<Arc<Srs<S>>>,
  Path(user_id): Path<Uuid>,
  Query(params): Query<DueParams>,
) -> Result<Json<Vec<DueCard>>, ApiError>
where
  S: ProgressStore + CardCatalog + 'static,
{
  let due = srs
    .due_cards(user_id, Utc::now(), params.limit.unwrap_or(DEFAULT_DUE_LIMIT))
    .await?;
  Ok(Json(due))
}

// ─── Submit review ───────────────────────────────────────────────────────────

/// JSON body accepted by `POST /users/:user_id/reviews`.
#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  pub card_id:             Uuid,
  /// Self-rated recall, 0–5. Out-of-range values are rejected with 400
  /// before any state changes.
  pub quality:             i32,
  pub time_to_answer_secs: Option<u32>,
}

/// `POST /users/:user_id/reviews` — returns the committed [`Progress`].
pub async fn submit<S>(
  State(srs): State<Arc<Srs<S>>>,
  Path(user_id): Path<Uuid>,
  Json(body): Json<SubmitBody>,
) -> Result<Json<Progress>, ApiError>
where
  S: ProgressStore + CardCatalog + 'static,
{
  let progress = srs
    .submit_review(
      user_id,
      body.card_id,
      body.quality,
      body.time_to_answer_secs,
      Utc::now(),
    )
    .await?;
  Ok(Json(progress))
}

// ─── Progress ────────────────────────────────────────────────────────────────

/// `GET /users/:user_id/progress/:card_id`
pub async fn progress<S>(
  State(srs): State<Arc<Srs<S>>>,
  Path((user_id, card_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Progress>, ApiError>
where
  S: ProgressStore + CardCatalog + 'static,
{
  let progress = srs.progress(user_id, card_id).await?;
  Ok(Json(progress))
}

// ─── History ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
  pub events: Vec<ReviewEvent>,
  /// Derived from the event log alone, independent of the progress
  /// counters.
  pub stats:  ReviewStats,
}

/// `GET /users/:user_id/progress/:card_id/events`
pub async fn events<S>(
  State(srs): State<Arc<Srs<S>>>,
  Path((user_id, card_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<HistoryResponse>, ApiError>
where
  S: ProgressStore + CardCatalog + 'static,
{
  let (events, stats) = srs.history(user_id, card_id).await?;
  Ok(Json(HistoryResponse { events, stats }))
}
