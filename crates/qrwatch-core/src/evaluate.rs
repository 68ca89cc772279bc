//! Compromise evaluation — compares a scanned destination against the
//! registered original.
//!
//! Two comparison policies exist in the field and flag different things: the
//! exact policy treats any byte difference as tampering (including a benign
//! trailing slash or scheme change), while the normalized policy ignores
//! cosmetic differences via [`crate::normalize::normalize`]. The choice is
//! deliberately a named configuration value, never a silent default baked
//! into a call site.
//!
//! Reputation lookups are a separate, independent signal; they are never
//! merged into the verdict returned here.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// How `original` and `scanned` URLs are compared.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonPolicy {
  /// Compare canonicalised keys; cosmetic differences are tolerated.
  #[default]
  Normalized,
  /// Byte-exact comparison. Stricter; flags scheme and trailing-slash edits.
  Exact,
}

/// Returns `true` when the scanned destination counts as tampering under
/// `policy`.
pub fn evaluate(policy: ComparisonPolicy, original: &str, scanned: &str) -> bool {
  match policy {
    ComparisonPolicy::Normalized => normalize(original) != normalize(scanned),
    ComparisonPolicy::Exact => original != scanned,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalized_policy_tolerates_cosmetic_differences() {
    assert!(!evaluate(
      ComparisonPolicy::Normalized,
      "https://a.com/x",
      "a.com/x/",
    ));
  }

  #[test]
  fn normalized_policy_flags_real_changes() {
    assert!(evaluate(
      ComparisonPolicy::Normalized,
      "https://a.com/x",
      "https://a.com/y",
    ));
    assert!(evaluate(
      ComparisonPolicy::Normalized,
      "https://bank.example.com/pay",
      "https://evil.example.net/pay",
    ));
  }

  #[test]
  fn exact_policy_flags_trailing_slash() {
    assert!(evaluate(
      ComparisonPolicy::Exact,
      "https://a.com/x",
      "https://a.com/x/",
    ));
    assert!(!evaluate(
      ComparisonPolicy::Exact,
      "https://a.com/x",
      "https://a.com/x",
    ));
  }
}
