//! JSON REST API for qrwatch.
//!
//! Exposes an axum [`Router`] backed by any [`qrwatch_core::store::QrStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", qrwatch_api::api_router(state))
//! ```

pub mod codes;
pub mod error;
pub mod inspect;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use qrwatch_core::{evaluate::ComparisonPolicy, store::QrStore};
use qrwatch_scanner::{Rescanner, UrlhausClient};

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state for every handler: the store, the configured comparison
/// policy, the re-scanner, and (optionally) the reputation client.
pub struct ApiState<S> {
  pub store:      Arc<S>,
  pub policy:     ComparisonPolicy,
  pub rescanner:  Arc<Rescanner>,
  /// `None` disables reputation enrichment entirely.
  pub reputation: Option<Arc<UrlhausClient>>,
}

// Manual impl: `#[derive(Clone)]` would demand `S: Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      policy:     self.policy,
      rescanner:  Arc::clone(&self.rescanner),
      reputation: self.reputation.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: QrStore + 'static,
{
  Router::new()
    // Records
    .route("/codes", get(codes::list::<S>).post(codes::create::<S>))
    .route(
      "/codes/{id}",
      get(codes::get_one::<S>)
        .put(codes::update_one::<S>)
        .delete(codes::delete_one::<S>),
    )
    // Inspection
    .route("/codes/{id}/inspect", post(inspect::inspect_one::<S>))
    .route("/codes/{id}/scans", get(inspect::scan_history::<S>))
    // Batch re-scan trigger
    .route("/rescan", post(inspect::rescan::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
