//! Error type for `qrwatch-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] qrwatch_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A scan-log row carried neither a resolved URL nor an error note.
  #[error("malformed scan entry: {0}")]
  MalformedScanEntry(uuid::Uuid),
}

impl qrwatch_core::store::StoreError for Error {
  fn is_unavailable(&self) -> bool {
    // Connection-level failures are the retryable class; query and decode
    // failures are not.
    matches!(
      self,
      Error::Database(tokio_rusqlite::Error::ConnectionClosed)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
