//! Best-effort URL reputation lookups against the URLhaus database.
//!
//! The verdict here is an independent signal, reported alongside the
//! URL-comparison verdict — the two are never merged. Callers treat any
//! lookup failure as "no signal", not as a failure of the inspection.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://urlhaus-api.abuse.ch/v1/url/";

// ─── Classification ──────────────────────────────────────────────────────────

/// A positive reputation hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatReport {
  /// Threat class, e.g. `"malware_download"`; `"malicious"` when the
  /// database flags the URL without classifying it.
  pub threat:      String,
  /// Finer-grained label; `"unknown"` when absent.
  pub threat_type: String,
  /// Link to the database entry, when one exists.
  pub reference:   Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Threat {
  /// No threat on record for this URL.
  Clean,
  Flagged(ThreatReport),
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Thin client for the URLhaus `POST /v1/url/` lookup.
#[derive(Debug, Clone)]
pub struct UrlhausClient {
  client:   reqwest::Client,
  endpoint: String,
}

#[derive(Debug, Deserialize)]
struct UrlhausResponse {
  query_status: String,
  threat:       Option<String>,
  threat_type:  Option<String>,
  id:           Option<String>,
}

impl UrlhausClient {
  pub fn new() -> Result<Self> {
    Self::with_endpoint(DEFAULT_ENDPOINT)
  }

  /// Point at a non-default endpoint (tests, mirrors).
  pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(5))
      .build()?;
    Ok(Self { client, endpoint: endpoint.into() })
  }

  /// Look up `url` in the database.
  pub async fn check(&self, url: &str) -> Result<Threat> {
    // The database expects a full URL; schemeless input gets https.
    let formatted = if url.starts_with("http") {
      url.to_owned()
    } else {
      format!("https://{url}")
    };

    let response: UrlhausResponse = self
      .client
      .post(&self.endpoint)
      .form(&[("url", formatted.as_str())])
      .send()
      .await?
      .error_for_status()?
      .json()
      .await?;

    match response.query_status.as_str() {
      "no_results" | "invalid_url" => Ok(Threat::Clean),
      "ok" => {
        let reference = response
          .id
          .map(|id| format!("https://urlhaus.abuse.ch/url/{id}/"));
        Ok(Threat::Flagged(ThreatReport {
          threat:      response.threat.unwrap_or_else(|| "malicious".into()),
          threat_type: response
            .threat_type
            .unwrap_or_else(|| "unknown".into()),
          reference,
        }))
      }
      other => Err(Error::Reputation(format!("query_status {other:?}"))),
    }
  }
}
