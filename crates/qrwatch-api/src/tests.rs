//! End-to-end tests: real router, in-memory SQLite store, no network.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, Response, StatusCode, header},
};
use qrwatch_core::evaluate::ComparisonPolicy;
use qrwatch_scanner::{RescanConfig, Rescanner};
use qrwatch_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiState, api_router};

async fn app() -> Router {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  let rescanner =
    Rescanner::new(ComparisonPolicy::Normalized, RescanConfig::default())
      .expect("rescanner");
  api_router(ApiState {
    store:      Arc::new(store),
    policy:     ComparisonPolicy::Normalized,
    rescanner:  Arc::new(rescanner),
    reputation: None,
  })
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
  let builder = Request::builder().method(method).uri(uri);
  match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  }
}

async fn body_json(response: Response<Body>) -> Value {
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router, description: &str, url: &str) -> String {
  let response = app
    .clone()
    .oneshot(request(
      "POST",
      "/codes",
      Some(json!({
        "original_url": url,
        "description": description,
        "address": "1 Main St",
      })),
    ))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::CREATED);
  let record = body_json(response).await;
  record["qr_id"].as_str().unwrap().to_owned()
}

// ─── Register / inspect ──────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_inspect_detects_tampering() {
  let app = app().await;
  let id =
    register(&app, "Lobby kiosk", "https://bank.example.com/pay").await;

  // A swapped code pointing somewhere else entirely.
  let response = app
    .clone()
    .oneshot(request(
      "POST",
      &format!("/codes/{id}/inspect"),
      Some(json!({ "scanned_url": "https://evil.example.net/pay" })),
    ))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let verdict = body_json(response).await;
  assert_eq!(verdict["success"], json!(true));
  assert_eq!(verdict["is_compromised"], json!(true));
  assert!(verdict["threat"].is_null());

  // A benign trailing-slash variant is clean under the normalized policy.
  let response = app
    .clone()
    .oneshot(request(
      "POST",
      &format!("/codes/{id}/inspect"),
      Some(json!({ "scanned_url": "https://bank.example.com/pay/" })),
    ))
    .await
    .unwrap();
  let verdict = body_json(response).await;
  assert_eq!(verdict["is_compromised"], json!(false));

  // The record reflects the latest inspection only; history keeps both.
  let response = app
    .clone()
    .oneshot(request("GET", &format!("/codes/{id}"), None))
    .await
    .unwrap();
  let record = body_json(response).await;
  assert_eq!(record["is_compromised"], json!(false));
  assert_eq!(
    record["last_scanned_url"],
    json!("https://bank.example.com/pay/")
  );

  let response = app
    .clone()
    .oneshot(request("GET", &format!("/codes/{id}/scans"), None))
    .await
    .unwrap();
  let history = body_json(response).await;
  let entries = history.as_array().unwrap();
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[0]["is_compromised"], json!(true));
  assert_eq!(entries[1]["is_compromised"], json!(false));
}

#[tokio::test]
async fn inspect_requires_a_scanned_url() {
  let app = app().await;
  let id = register(&app, "kiosk", "https://bank.example.com/pay").await;

  let response = app
    .clone()
    .oneshot(request(
      "POST",
      &format!("/codes/{id}/inspect"),
      Some(json!({ "scanned_url": "   " })),
    ))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inspect_unknown_record_is_404() {
  let app = app().await;
  let response = app
    .clone()
    .oneshot(request(
      "POST",
      &format!("/codes/{}/inspect", uuid::Uuid::new_v4()),
      Some(json!({ "scanned_url": "https://anything.example" })),
    ))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ─── Register validation ─────────────────────────────────────────────────────

#[tokio::test]
async fn register_rejects_blank_fields() {
  let app = app().await;
  let response = app
    .clone()
    .oneshot(request(
      "POST",
      "/codes",
      Some(json!({
        "original_url": "https://bank.example.com/pay",
        "description": "",
        "address": "1 Main St",
      })),
    ))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  let body = body_json(response).await;
  assert!(
    body["error"].as_str().unwrap().contains("description"),
    "error should name the offending field"
  );
}

// ─── Detail / update / delete ────────────────────────────────────────────────

#[tokio::test]
async fn detail_unknown_record_is_404() {
  let app = app().await;
  let response = app
    .clone()
    .oneshot(request(
      "GET",
      &format!("/codes/{}", uuid::Uuid::new_v4()),
      None,
    ))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_edits_registration_fields() {
  let app = app().await;
  let id = register(&app, "kiosk", "https://bank.example.com/pay").await;

  let response = app
    .clone()
    .oneshot(request(
      "PUT",
      &format!("/codes/{id}"),
      Some(json!({
        "original_url": "https://bank.example.com/pay2",
        "description": "kiosk (relocated)",
        "address": "2 Main St",
      })),
    ))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let record = body_json(response).await;
  assert_eq!(record["original_url"], json!("https://bank.example.com/pay2"));
  assert_eq!(record["description"], json!("kiosk (relocated)"));
}

#[tokio::test]
async fn delete_is_permanent_and_repeatable_as_404() {
  let app = app().await;
  let id = register(&app, "doomed", "https://bank.example.com/pay").await;

  let response = app
    .clone()
    .oneshot(request("DELETE", &format!("/codes/{id}"), None))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let response = app
    .clone()
    .oneshot(request("GET", &format!("/codes/{id}"), None))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::NOT_FOUND);

  let response = app
    .clone()
    .oneshot(request("DELETE", &format!("/codes/{id}"), None))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ─── List ordering ───────────────────────────────────────────────────────────

#[tokio::test]
async fn inspection_order_promotes_never_scanned_records() {
  let app = app().await;
  let scanned = register(&app, "scanned", "https://a.example.com").await;
  let fresh = register(&app, "fresh", "https://b.example.com").await;

  app
    .clone()
    .oneshot(request(
      "POST",
      &format!("/codes/{scanned}/inspect"),
      Some(json!({ "scanned_url": "https://a.example.com" })),
    ))
    .await
    .unwrap();

  let response = app
    .clone()
    .oneshot(request("GET", "/codes?order=inspection", None))
    .await
    .unwrap();
  let list = body_json(response).await;
  let ids: Vec<&str> = list
    .as_array()
    .unwrap()
    .iter()
    .map(|r| r["qr_id"].as_str().unwrap())
    .collect();
  assert_eq!(ids, vec![fresh.as_str(), scanned.as_str()]);
}

// ─── Re-scan trigger ─────────────────────────────────────────────────────────

#[tokio::test]
async fn rescan_of_empty_store_acknowledges_with_zero_summary() {
  let app = app().await;
  let response = app
    .clone()
    .oneshot(request("POST", "/rescan", None))
    .await
    .unwrap();
  assert_eq!(response.status(), StatusCode::OK);
  let summary = body_json(response).await;
  assert_eq!(summary, json!({ "scanned": 0, "compromised": 0, "failed": 0 }));
}
