//! Error type for `qrwatch-scanner`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("unexpected reputation response: {0}")]
  Reputation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
