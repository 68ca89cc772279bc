//! Outbound HTTP for qrwatch: the batch re-scanner and the optional URLhaus
//! reputation client.
//!
//! Everything in this crate is best-effort by design — a failed fetch or a
//! failed reputation lookup degrades to a recorded "no signal", never to a
//! failure of the enclosing operation.

pub mod error;
pub mod reputation;
pub mod rescan;

pub use error::{Error, Result};
pub use reputation::{Threat, ThreatReport, UrlhausClient};
pub use rescan::{RescanConfig, RescanSummary, Rescanner};
