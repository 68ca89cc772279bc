//! The `QrStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `qrwatch-store-sqlite`).
//! Higher layers (`qrwatch-api`, `qrwatch-scanner`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::record::{NewQrRecord, QrRecord, ScanEntry, ScanOutcome, UpdateQrRecord};

// ─── Backend errors ──────────────────────────────────────────────────────────

/// Implemented by backend error types so generic callers can distinguish
/// "the store itself is unreachable" (retryable, worth a 503) from every
/// other failure.
pub trait StoreError: std::error::Error {
  /// True when the backing store could not be reached at all — a connection
  /// or session could not be acquired, as opposed to a bad query or a
  /// corrupt row.
  fn is_unavailable(&self) -> bool { false }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a QR record store backend.
///
/// The store is the single source of truth for `last_scanned_url`,
/// `last_scanned_at`, and `is_compromised`; [`QrStore::record_scan`] is the
/// only mutation path for those fields. Every successful scan recording also
/// appends to the record's immutable scan log.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait QrStore: Send + Sync {
  type Error: StoreError + Send + Sync + 'static;

  /// Create and persist a new record. Validates the input, assigns the id
  /// and timestamps, and initialises `is_compromised` to `false`.
  fn create(
    &self,
    input: NewQrRecord,
  ) -> impl Future<Output = Result<QrRecord, Self::Error>> + Send + '_;

  /// List all records, most recently registered first.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<QrRecord>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<QrRecord>, Self::Error>> + Send + '_;

  /// Edit the registration fields (`original_url`, `description`,
  /// `address`). Never touches the scan-state fields. Returns the updated
  /// record, or `None` if the id does not resolve.
  fn update(
    &self,
    id: Uuid,
    input: UpdateQrRecord,
  ) -> impl Future<Output = Result<Option<QrRecord>, Self::Error>> + Send + '_;

  /// Record the outcome of one inspection or re-scan attempt.
  ///
  /// A [`ScanOutcome::Resolved`] outcome sets `last_scanned_url`,
  /// `last_scanned_at = now`, and `is_compromised`; a
  /// [`ScanOutcome::Failed`] outcome advances `last_scanned_at` only. Both
  /// append a [`ScanEntry`]. Returns the updated record, or `None` if the
  /// id does not resolve.
  ///
  /// Concurrent calls for the same id are not coordinated: the last write
  /// wins. Two simultaneous inspections of one physical code is an accepted
  /// benign race; the domain does not require serialisability here.
  fn record_scan(
    &self,
    id: Uuid,
    outcome: ScanOutcome,
  ) -> impl Future<Output = Result<Option<QrRecord>, Self::Error>> + Send + '_;

  /// Permanently delete a record and its scan history. Returns `false` if
  /// the id does not resolve — a repeat delete reports not-found rather
  /// than silent success.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The record's append-only scan log, oldest first.
  fn scan_history(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<ScanEntry>, Self::Error>> + Send + '_;
}

// ─── Display ordering ────────────────────────────────────────────────────────

/// Sort records for the "needs inspection" view: never-scanned records first
/// (newest registration first among them), then the rest by
/// `last_scanned_at` descending.
///
/// This is a presentation concern, not a store invariant — the store's own
/// [`QrStore::list`] order is always registration time descending.
pub fn inspection_order(records: &mut [QrRecord]) {
  records.sort_by(|a, b| match (a.last_scanned_at, b.last_scanned_at) {
    (None, None) => b.created_at.cmp(&a.created_at),
    (None, Some(_)) => std::cmp::Ordering::Less,
    (Some(_), None) => std::cmp::Ordering::Greater,
    (Some(x), Some(y)) => y.cmp(&x),
  });
}
