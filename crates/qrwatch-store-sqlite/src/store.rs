//! [`SqliteStore`] — the SQLite implementation of [`QrStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use qrwatch_core::{
  record::{NewQrRecord, QrRecord, ScanEntry, ScanOutcome, UpdateQrRecord},
  store::QrStore,
};

use crate::{
  Error, Result,
  encode::{RawQrRecord, RawScanEntry, encode_dt, encode_uuid},
  schema::SCHEMA,
};

const RECORD_COLUMNS: &str = "qr_id, original_url, description, address, \
   last_scanned_url, last_scanned_at, is_compromised, created_at, updated_at";

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawQrRecord> {
  Ok(RawQrRecord {
    qr_id:            row.get(0)?,
    original_url:     row.get(1)?,
    description:      row.get(2)?,
    address:          row.get(3)?,
    last_scanned_url: row.get(4)?,
    last_scanned_at:  row.get(5)?,
    is_compromised:   row.get(6)?,
    created_at:       row.get(7)?,
    updated_at:       row.get(8)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A qrwatch record store backed by a single SQLite file.
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

  async fn fetch(&self, id: Uuid) -> Result<Option<QrRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawQrRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {RECORD_COLUMNS} FROM qr_codes WHERE qr_id = ?1"),
              rusqlite::params![id_str],
              record_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawQrRecord::into_record).transpose()
  }
}

// ─── QrStore impl ────────────────────────────────────────────────────────────

impl QrStore for SqliteStore {
  type Error = Error;

  async fn create(&self, input: NewQrRecord) -> Result<QrRecord> {
    input.validate().map_err(Error::Core)?;

    let now = Utc::now();
    let record = QrRecord {
      qr_id:            Uuid::new_v4(),
      original_url:     input.original_url,
      description:      input.description,
      address:          input.address,
      last_scanned_url: None,
      last_scanned_at:  None,
      is_compromised:   false,
      created_at:       now,
      updated_at:       now,
    };

    let id_str  = encode_uuid(record.qr_id);
    let url     = record.original_url.clone();
    let desc    = record.description.clone();
    let address = record.address.clone();
    let at_str  = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO qr_codes (
             qr_id, original_url, description, address,
             is_compromised, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
          rusqlite::params![id_str, url, desc, address, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn list(&self) -> Result<Vec<QrRecord>> {
    let raws: Vec<RawQrRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM qr_codes ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map([], record_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQrRecord::into_record).collect()
  }

  async fn get(&self, id: Uuid) -> Result<Option<QrRecord>> {
    self.fetch(id).await
  }

  async fn update(
    &self,
    id: Uuid,
    input: UpdateQrRecord,
  ) -> Result<Option<QrRecord>> {
    input.validate().map_err(Error::Core)?;

    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE qr_codes
           SET original_url = ?1, description = ?2, address = ?3,
               updated_at = ?4
           WHERE qr_id = ?5",
          rusqlite::params![
            input.original_url,
            input.description,
            input.address,
            at_str,
            id_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.fetch(id).await
  }

  async fn record_scan(
    &self,
    id: Uuid,
    outcome: ScanOutcome,
  ) -> Result<Option<QrRecord>> {
    let now = Utc::now();
    let entry = ScanEntry {
      scan_id:    Uuid::new_v4(),
      qr_id:      id,
      scanned_at: now,
      outcome,
    };

    let scan_id_str = encode_uuid(entry.scan_id);
    let id_str      = encode_uuid(id);
    let at_str      = encode_dt(now);
    let outcome     = entry.outcome;

    let changed: usize = self
      .conn
      .call(move |conn| {
        // Both statements commit together; the scan log must never diverge
        // from the record's last-scan fields.
        let tx = conn.transaction()?;

        let changed = match &outcome {
          ScanOutcome::Resolved { scanned_url, is_compromised } => {
            let changed = tx.execute(
              "UPDATE qr_codes
               SET last_scanned_url = ?1, last_scanned_at = ?2,
                   is_compromised = ?3, updated_at = ?2
               WHERE qr_id = ?4",
              rusqlite::params![scanned_url, at_str, is_compromised, id_str],
            )?;
            if changed > 0 {
              tx.execute(
                "INSERT INTO scans (scan_id, qr_id, scanned_at, scanned_url, is_compromised)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                  scan_id_str,
                  id_str,
                  at_str,
                  scanned_url,
                  is_compromised,
                ],
              )?;
            }
            changed
          }
          // A failed fetch still counts as an attempt: the timestamp
          // advances, the compromise flag does not.
          ScanOutcome::Failed { error } => {
            let changed = tx.execute(
              "UPDATE qr_codes
               SET last_scanned_at = ?1, updated_at = ?1
               WHERE qr_id = ?2",
              rusqlite::params![at_str, id_str],
            )?;
            if changed > 0 {
              tx.execute(
                "INSERT INTO scans (scan_id, qr_id, scanned_at, error)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![scan_id_str, id_str, at_str, error],
              )?;
            }
            changed
          }
        };

        tx.commit()?;
        Ok(changed)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.fetch(id).await
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM qr_codes WHERE qr_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn scan_history(&self, id: Uuid) -> Result<Vec<ScanEntry>> {
    let id_str = encode_uuid(id);

    let raws: Vec<RawScanEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT scan_id, qr_id, scanned_at, scanned_url, is_compromised, error
           FROM scans
           WHERE qr_id = ?1
           ORDER BY scanned_at ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawScanEntry {
              scan_id:        row.get(0)?,
              qr_id:          row.get(1)?,
              scanned_at:     row.get(2)?,
              scanned_url:    row.get(3)?,
              is_compromised: row.get(4)?,
              error:          row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawScanEntry::into_entry).collect()
  }
}
