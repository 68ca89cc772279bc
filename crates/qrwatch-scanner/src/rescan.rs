//! The batch re-scanner.
//!
//! Revisits every registered `original_url` over HTTP with redirect
//! following, and treats drift of the final resolved URL as compromise.
//! This is the self-referential check — "does the registered URL still lead
//! where it did when it was registered" — and complements field inspections,
//! which ask whether the printed code itself was swapped.

use std::time::Duration;

use serde::Serialize;

use qrwatch_core::{
  evaluate::{ComparisonPolicy, evaluate},
  record::ScanOutcome,
  store::QrStore,
};

use crate::Result;

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RescanConfig {
  /// Connect/read bound for each fetch.
  pub timeout:       Duration,
  /// Redirect hop cap; fetches exceeding it count as failures.
  pub max_redirects: usize,
}

impl Default for RescanConfig {
  fn default() -> Self {
    Self { timeout: Duration::from_secs(5), max_redirects: 5 }
  }
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// What the caller of a sweep gets back. Per-record results live only in
/// each record's scan history.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RescanSummary {
  /// Records whose fetch resolved and was compared.
  pub scanned:     usize,
  /// Subset of `scanned` flagged as compromised.
  pub compromised: usize,
  /// Records whose fetch failed; their compromise flag was left unchanged.
  pub failed:      usize,
}

// ─── Rescanner ───────────────────────────────────────────────────────────────

pub struct Rescanner {
  client: reqwest::Client,
  policy: ComparisonPolicy,
}

impl Rescanner {
  pub fn new(policy: ComparisonPolicy, config: RescanConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
      .timeout(config.timeout)
      .build()?;
    Ok(Self { client, policy })
  }

  /// Sweep every record in `store` once.
  ///
  /// Each record's outcome is committed independently; a fetch failure for
  /// one record is recorded against that record and the sweep continues.
  /// Only store failures propagate.
  pub async fn rescan_all<S: QrStore>(
    &self,
    store: &S,
  ) -> Result<RescanSummary, S::Error> {
    let records = store.list().await?;
    let mut summary = RescanSummary::default();

    for record in records {
      let outcome = match self.resolve(&record.original_url).await {
        Ok(final_url) => {
          let is_compromised =
            evaluate(self.policy, &record.original_url, &final_url);
          if is_compromised {
            tracing::warn!(
              description = %record.description,
              original_url = %record.original_url,
              final_url = %final_url,
              "registered URL has drifted",
            );
          }
          summary.scanned += 1;
          ScanOutcome::Resolved { scanned_url: final_url, is_compromised }
        }
        Err(e) => {
          summary.failed += 1;
          tracing::warn!(
            description = %record.description,
            original_url = %record.original_url,
            error = %e,
            "re-scan fetch failed",
          );
          ScanOutcome::Failed { error: e.to_string() }
        }
      };

      if outcome.is_compromised() {
        summary.compromised += 1;
      }

      if store.record_scan(record.qr_id, outcome).await?.is_none() {
        // Deleted mid-sweep; nothing to record against.
        tracing::debug!(qr_id = %record.qr_id, "record vanished during sweep");
      }
    }

    tracing::info!(
      scanned = summary.scanned,
      compromised = summary.compromised,
      failed = summary.failed,
      "re-scan sweep complete",
    );
    Ok(summary)
  }

  /// Fetch `url` and return the final post-redirect URL. Response status is
  /// deliberately ignored — a 404 from the right host is not drift.
  async fn resolve(&self, url: &str) -> Result<String> {
    let response = self.client.get(url).send().await?;
    Ok(response.url().to_string())
  }
}
