//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use qrwatch_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The backing store could not be reached; worth retrying.
  #[error("store unavailable")]
  Unavailable,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend failure: connection-acquisition failures become a
  /// retryable 503, everything else a 500. Detail is logged server-side
  /// either way.
  pub fn from_store<E>(e: E) -> Self
  where
    E: StoreError + Send + Sync + 'static,
  {
    if e.is_unavailable() {
      tracing::error!(error = %e, "store unavailable");
      ApiError::Unavailable
    } else {
      ApiError::Store(Box::new(e))
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unavailable => (
        StatusCode::SERVICE_UNAVAILABLE,
        "store temporarily unavailable, please retry".to_owned(),
      ),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
