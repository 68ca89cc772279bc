//! QR record types — the single persistent entity of the service.
//!
//! A record binds a QR code's trusted destination (`original_url`) to a
//! physical installation site. Inspections and batch re-scans mutate only the
//! `last_scanned_*` / `is_compromised` fields; everything they observe is
//! also appended to an immutable scan log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Record ──────────────────────────────────────────────────────────────────

/// A registered QR code and the latest known state of its deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrRecord {
  pub qr_id:            Uuid,
  /// The trusted destination the code was registered to point to.
  pub original_url:     String,
  pub description:      String,
  /// Installation site, free text (e.g. "1 Main St, lobby kiosk").
  pub address:          String,
  pub last_scanned_url: Option<String>,
  /// Set on every inspection or re-scan attempt, including failed fetches.
  pub last_scanned_at:  Option<DateTime<Utc>>,
  /// Always the verdict of the most recent successful comparison; never set
  /// independently of a scan event.
  pub is_compromised:   bool,
  pub created_at:       DateTime<Utc>,
  /// Refreshed by the store on every mutation.
  pub updated_at:       DateTime<Utc>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::QrStore::create`]. Ids and timestamps are always
/// assigned by the store; they are not accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQrRecord {
  pub original_url: String,
  pub description:  String,
  pub address:      String,
}

impl NewQrRecord {
  /// All three fields are required and must be non-blank.
  pub fn validate(&self) -> Result<()> {
    require("original_url", &self.original_url)?;
    require("description", &self.description)?;
    require("address", &self.address)?;
    Ok(())
  }
}

/// Input to [`crate::store::QrStore::update`]. Edits the registration fields
/// only; scan state is owned exclusively by the scan-recording path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQrRecord {
  pub original_url: String,
  pub description:  String,
  pub address:      String,
}

impl UpdateQrRecord {
  pub fn validate(&self) -> Result<()> {
    require("original_url", &self.original_url)?;
    require("description", &self.description)?;
    require("address", &self.address)?;
    Ok(())
  }
}

fn require(name: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::MissingField(name));
  }
  Ok(())
}

// ─── Scan log ────────────────────────────────────────────────────────────────

/// What a single inspection or re-scan attempt observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
  /// The code (or registered URL) resolved to `scanned_url` and was compared
  /// against the original.
  Resolved {
    scanned_url:    String,
    is_compromised: bool,
  },
  /// The fetch failed before any URL could be resolved. The record's
  /// compromise flag is left untouched.
  Failed { error: String },
}

impl ScanOutcome {
  pub fn is_compromised(&self) -> bool {
    matches!(self, Self::Resolved { is_compromised: true, .. })
  }
}

/// One entry in a record's append-only scan history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEntry {
  pub scan_id:    Uuid,
  pub qr_id:      Uuid,
  /// Server-assigned; never changes after creation.
  pub scanned_at: DateTime<Utc>,
  #[serde(flatten)]
  pub outcome:    ScanOutcome,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input() -> NewQrRecord {
    NewQrRecord {
      original_url: "https://bank.example.com/pay".into(),
      description:  "Lobby kiosk".into(),
      address:      "1 Main St".into(),
    }
  }

  #[test]
  fn valid_input_passes() {
    assert!(input().validate().is_ok());
  }

  #[test]
  fn blank_required_field_is_rejected() {
    let mut bad = input();
    bad.description = "   ".into();
    assert!(matches!(
      bad.validate(),
      Err(Error::MissingField("description"))
    ));

    let mut bad = input();
    bad.original_url = String::new();
    assert!(matches!(
      bad.validate(),
      Err(Error::MissingField("original_url"))
    ));
  }
}
