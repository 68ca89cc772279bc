//! Handlers for the `/codes` CRUD endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/codes` | Optional `?order=registered\|inspection` |
//! | `POST`   | `/codes` | Body: [`NewQrRecord`]; returns 201 + record |
//! | `GET`    | `/codes/:id` | 404 if not found |
//! | `PUT`    | `/codes/:id` | Edits registration fields only |
//! | `DELETE` | `/codes/:id` | Permanent; repeat deletes are 404 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use qrwatch_core::{
  record::{NewQrRecord, QrRecord, UpdateQrRecord},
  store::{QrStore, inspection_order},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

/// Display order for the record list.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListOrder {
  /// Most recently registered first (the store's native order).
  #[default]
  Registered,
  /// Never-scanned records first, then stalest-scan last — the
  /// "needs inspection" worklist.
  Inspection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub order: ListOrder,
}

/// `GET /codes[?order=registered|inspection]`
pub async fn list<S: QrStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<QrRecord>>, ApiError> {
  let mut records = state.store.list().await.map_err(ApiError::from_store)?;
  if let ListOrder::Inspection = params.order {
    inspection_order(&mut records);
  }
  Ok(Json(records))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /codes` — body: `{"original_url":..., "description":..., "address":...}`
pub async fn create<S: QrStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewQrRecord>,
) -> Result<impl IntoResponse, ApiError> {
  // Validation happens at the boundary; the store never sees bad input.
  body
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let record = state
    .store
    .create(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /codes/:id`
pub async fn get_one<S: QrStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<QrRecord>, ApiError> {
  let record = state
    .store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("QR record {id} not found")))?;
  Ok(Json(record))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /codes/:id` — body: [`UpdateQrRecord`].
pub async fn update_one<S: QrStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateQrRecord>,
) -> Result<Json<QrRecord>, ApiError> {
  body
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let record = state
    .store
    .update(id, body)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("QR record {id} not found")))?;
  Ok(Json(record))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /codes/:id` — permanent, no tombstone.
pub async fn delete_one<S: QrStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  let deleted = state
    .store
    .delete(id)
    .await
    .map_err(ApiError::from_store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("QR record {id} not found")));
  }
  Ok(Json(json!({ "message": "QR record deleted" })))
}
