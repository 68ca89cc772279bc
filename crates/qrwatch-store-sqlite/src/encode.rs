//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Booleans use SQLite's integer convention.

use chrono::{DateTime, Utc};
use qrwatch_core::record::{QrRecord, ScanEntry, ScanOutcome};
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

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `qr_codes` row.
pub struct RawQrRecord {
  pub qr_id:            String,
  pub original_url:     String,
  pub description:      String,
  pub address:          String,
  pub last_scanned_url: Option<String>,
  pub last_scanned_at:  Option<String>,
  pub is_compromised:   bool,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawQrRecord {
  pub fn into_record(self) -> Result<QrRecord> {
    Ok(QrRecord {
      qr_id:            decode_uuid(&self.qr_id)?,
      original_url:     self.original_url,
      description:      self.description,
      address:          self.address,
      last_scanned_url: self.last_scanned_url,
      last_scanned_at:  self
        .last_scanned_at
        .as_deref()
        .map(decode_dt)
        .transpose()?,
      is_compromised:   self.is_compromised,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `scans` row.
pub struct RawScanEntry {
  pub scan_id:        String,
  pub qr_id:          String,
  pub scanned_at:     String,
  pub scanned_url:    Option<String>,
  pub is_compromised: Option<bool>,
  pub error:          Option<String>,
}

impl RawScanEntry {
  pub fn into_entry(self) -> Result<ScanEntry> {
    let scan_id = decode_uuid(&self.scan_id)?;

    let outcome = match (self.scanned_url, self.is_compromised, self.error) {
      (Some(scanned_url), Some(is_compromised), _) => {
        ScanOutcome::Resolved { scanned_url, is_compromised }
      }
      (_, _, Some(error)) => ScanOutcome::Failed { error },
      _ => return Err(Error::MalformedScanEntry(scan_id)),
    };

    Ok(ScanEntry {
      scan_id,
      qr_id: decode_uuid(&self.qr_id)?,
      scanned_at: decode_dt(&self.scanned_at)?,
      outcome,
    })
  }
}
