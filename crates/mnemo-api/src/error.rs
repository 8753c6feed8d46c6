//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] mnemo_core::Error),
}

impl From<mnemo_core::Error> for ApiError {
  fn from(e: mnemo_core::Error) -> Self {
    match &e {
      mnemo_core::Error::InvalidQuality(_) => Self::BadRequest(e.to_string()),
      mnemo_core::Error::ProgressNotFound { .. } => Self::NotFound(e.to_string()),
      mnemo_core::Error::ConcurrentModification { .. } => Self::Conflict(e.to_string()),
      mnemo_core::Error::Storage(_) => Self::Store(e),
    }
  }
}

impl ApiError {
  /// Route a store-level error through the core taxonomy.
  pub fn from_store<E: Into<mnemo_core::Error>>(e: E) -> Self { Self::from(e.into()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
