//! Handlers for `/cards` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/cards` | All catalog card IDs |
//! | `POST` | `/cards` | Body: `{"prompt":"...","answer":"..."}` |
//! | `GET`  | `/cards/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use mnemo_core::{
  card::{Card, NewCard},
  service::Srs,
  store::{CardCatalog, ProgressStore},
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /cards` — every card id in the catalog.
pub async fn list<S>(
  State(srs): State<Arc<Srs<S>>>,
) -> Result<Json<Vec<Uuid>>, ApiError>
where
  S: ProgressStore + CardCatalog + 'static,
{
  let ids = srs
    .store()
    .list_card_ids()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(ids))
}

/// `POST /cards` — body: `{"prompt":"...","answer":"..."}`
pub async fn create<S>(
  State(srs): State<Arc<Srs<S>>>,
  Json(body): Json<NewCard>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProgressStore + CardCatalog + 'static,
{
  let card = srs
    .store()
    .add_card(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(card)))
}

/// `GET /cards/:id`
pub async fn get_one<S>(
  State(srs): State<Arc<Srs<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Card>, ApiError>
where
  S: ProgressStore + CardCatalog + 'static,
{
  let card = srs
    .store()
    .get_card(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("card {id} not found")))?;
  Ok(Json(card))
}
