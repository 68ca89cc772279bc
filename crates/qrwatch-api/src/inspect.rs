//! Handlers for inspections, scan history, and the batch re-scan trigger.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/codes/:id/inspect` | Body: `{"scanned_url":"..."}` |
//! | `GET`  | `/codes/:id/scans` | Append-only history, oldest first |
//! | `POST` | `/rescan` | Sweeps every record; returns only a summary |

use axum::{
  Json,
  extract::{Path, State},
};
use qrwatch_core::{
  evaluate::evaluate,
  record::{ScanEntry, ScanOutcome},
  store::QrStore,
};
use qrwatch_scanner::{RescanSummary, Threat, reputation::ThreatReport};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Inspect ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InspectBody {
  pub scanned_url: String,
}

/// Result of one inspection. The URL-comparison verdict and the reputation
/// verdict are distinct signals; callers combine them as their policy
/// dictates.
#[derive(Debug, Serialize)]
pub struct InspectResponse {
  pub success:        bool,
  pub is_compromised: bool,
  /// Present only when reputation lookup is enabled and returned a hit.
  pub threat:         Option<ThreatReport>,
  pub message:        String,
}

/// `POST /codes/:id/inspect` — body: `{"scanned_url":"..."}`.
///
/// Always results in exactly one persisted scan recording, whether or not
/// the reputation lookup succeeds.
pub async fn inspect_one<S: QrStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<InspectBody>,
) -> Result<Json<InspectResponse>, ApiError> {
  if body.scanned_url.trim().is_empty() {
    return Err(ApiError::BadRequest("scanned_url is required".into()));
  }

  let record = state
    .store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("QR record {id} not found")))?;

  let is_compromised =
    evaluate(state.policy, &record.original_url, &body.scanned_url);

  // Best-effort enrichment: a lookup failure is "no signal", never a
  // failure of the inspection.
  let threat = match &state.reputation {
    Some(client) => match client.check(&body.scanned_url).await {
      Ok(Threat::Flagged(report)) => Some(report),
      Ok(Threat::Clean) => None,
      Err(e) => {
        tracing::warn!(error = %e, "reputation lookup failed");
        None
      }
    },
    None => None,
  };

  state
    .store
    .record_scan(
      id,
      ScanOutcome::Resolved {
        scanned_url: body.scanned_url,
        is_compromised,
      },
    )
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("QR record {id} not found")))?;

  let message = if is_compromised {
    "scanned destination does not match the registered URL".to_owned()
  } else {
    "scanned destination matches the registered URL".to_owned()
  };

  Ok(Json(InspectResponse {
    success: true,
    is_compromised,
    threat,
    message,
  }))
}

// ─── Scan history ────────────────────────────────────────────────────────────

/// `GET /codes/:id/scans`
pub async fn scan_history<S: QrStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<ScanEntry>>, ApiError> {
  // Distinguish "no scans yet" from "no such record".
  state
    .store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("QR record {id} not found")))?;

  let history = state
    .store
    .scan_history(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(history))
}

// ─── Re-scan trigger ─────────────────────────────────────────────────────────

/// `POST /rescan` — sweep every record once.
///
/// Per-record results are recorded in each record's scan history; the caller
/// gets only the sweep summary.
pub async fn rescan<S: QrStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<RescanSummary>, ApiError> {
  let summary = state
    .rescanner
    .rescan_all(state.store.as_ref())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(summary))
}
