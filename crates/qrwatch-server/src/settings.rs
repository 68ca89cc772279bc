//! Runtime server configuration, deserialised from `config.toml` layered
//! under the `QRWATCH_*` environment.

use std::path::PathBuf;

use qrwatch_core::evaluate::ComparisonPolicy;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  #[serde(default = "default_store_path")]
  pub store_path:           PathBuf,
  /// How inspections compare scanned URLs against originals. Deliberately
  /// explicit: the exact policy flags benign trailing-slash and scheme
  /// edits, and that operational cost should be opted into.
  #[serde(default)]
  pub comparison_policy:    ComparisonPolicy,
  /// Enables URLhaus reputation enrichment on inspections.
  #[serde(default)]
  pub reputation_enabled:   bool,
  #[serde(default = "default_reputation_endpoint")]
  pub reputation_endpoint:  String,
  /// Per-fetch bound for the batch re-scanner, in seconds.
  #[serde(default = "default_rescan_timeout_secs")]
  pub rescan_timeout_secs:  u64,
  /// Redirect hop cap for the batch re-scanner.
  #[serde(default = "default_rescan_max_redirects")]
  pub rescan_max_redirects: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 default_host(),
      port:                 default_port(),
      store_path:           default_store_path(),
      comparison_policy:    ComparisonPolicy::default(),
      reputation_enabled:   false,
      reputation_endpoint:  default_reputation_endpoint(),
      rescan_timeout_secs:  default_rescan_timeout_secs(),
      rescan_max_redirects: default_rescan_max_redirects(),
    }
  }
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("qrwatch.db") }

fn default_reputation_endpoint() -> String {
  qrwatch_scanner::reputation::DEFAULT_ENDPOINT.to_owned()
}

fn default_rescan_timeout_secs() -> u64 { 5 }

fn default_rescan_max_redirects() -> usize { 5 }
