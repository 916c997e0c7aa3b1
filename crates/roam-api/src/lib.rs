//! JSON REST API for Roam.
//!
//! Exposes an axum [`Router`] backed by any
//! [`roam_core::store::LocationStore`]. Authentication is the upstream
//! provider's responsibility: requests arrive carrying a user id that has
//! already been verified.
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, roam_api::router(state)).await?;
//! ```

pub mod checkins;
pub mod error;
pub mod points;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use roam_core::store::LocationStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Pass storage failure messages through 500 responses. Keep off outside
  /// local debugging; the full error is always logged.
  #[serde(default)]
  pub expose_storage_errors: bool,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: LocationStore> {
  pub store: Arc<S>,
  pub expose_storage_errors: bool,
}

impl<S: LocationStore> AppState<S> {
  /// Translate a domain failure using this state's exposure policy.
  pub(crate) fn domain_err(&self, err: roam_core::Error) -> ApiError {
    ApiError::from_domain(err, self.expose_storage_errors)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for the points API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: LocationStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Points
    .route(
      "/points",
      post(points::create::<S>).delete(points::delete_one::<S>),
    )
    .route("/points/{id}", get(points::get_one::<S>))
    .route("/points/by-name/{name}", get(points::by_name::<S>))
    .route("/points/within", post(points::within::<S>))
    // Check-ins
    .route(
      "/checkins",
      post(checkins::check_in::<S>).delete(checkins::check_out::<S>),
    )
    .route("/checkins/info", get(checkins::info::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use roam_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state() -> (AppState<SqliteStore>, i64) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let user_id = store
      .seed_user("alice", "alice@example.com", "$argon2id$stub")
      .await
      .unwrap();
    let state = AppState {
      store: Arc::new(store),
      expose_storage_errors: false,
    };
    (state, user_id)
  }

  async fn send(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    router(state).oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_of(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn create_point(
    state: &AppState<SqliteStore>,
    name: &str,
    latitude: f64,
    longitude: f64,
    user_id: i64,
  ) -> i64 {
    let resp = send(
      state.clone(),
      "POST",
      "/points",
      Some(json!({
        "name": name,
        "latitude": latitude,
        "longitude": longitude,
        "user_id": user_id,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    json_of(resp).await["point_id"].as_i64().unwrap()
  }

  // ── Points ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_and_get_point() {
    let (state, user_id) = make_state().await;

    let resp = send(
      state.clone(),
      "POST",
      "/points",
      Some(json!({
        "name": "  Central Cafe  ",
        "description": "espresso on the corner",
        "latitude": 10.0,
        "longitude": 20.0,
        "user_id": user_id,
        "color": "#ff4400",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let id = json_of(resp).await["point_id"].as_i64().unwrap();

    let resp = send(state, "GET", &format!("/points/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_of(resp).await;
    // Name is stored trimmed.
    assert_eq!(body["point"]["name"], "Central Cafe");
    assert_eq!(body["point"]["color"], "#ff4400");
    assert_eq!(body["point"]["user_id"].as_i64().unwrap(), user_id);
  }

  #[tokio::test]
  async fn get_point_rejects_bad_ids() {
    let (state, _) = make_state().await;

    let resp = send(state.clone(), "GET", "/points/0", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Non-numeric path segment is rejected before the handler runs.
    let resp = send(state, "GET", "/points/abc", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn get_point_missing_is_404() {
    let (state, _) = make_state().await;
    let resp = send(state, "GET", "/points/42", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn create_validates_fields() {
    let (state, user_id) = make_state().await;

    // Missing name.
    let resp = send(
      state.clone(),
      "POST",
      "/points",
      Some(json!({ "latitude": 1.0, "longitude": 2.0, "user_id": user_id })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(
      json_of(resp).await["error"]
        .as_str()
        .unwrap()
        .contains("name is required")
    );

    // Latitude out of range, regardless of other fields.
    let resp = send(
      state.clone(),
      "POST",
      "/points",
      Some(json!({
        "name": "Cafe", "latitude": 91.0, "longitude": 2.0, "user_id": user_id,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Optional fields must not be blank when present.
    let resp = send(
      state,
      "POST",
      "/points",
      Some(json!({
        "name": "Cafe", "latitude": 1.0, "longitude": 2.0, "user_id": user_id,
        "color": "   ",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  /// Duplicate coordinates answer 400, not 409 — the one deliberately
  /// irregular conflict mapping in the interface contract.
  #[tokio::test]
  async fn duplicate_coordinates_answer_400() {
    let (state, user_id) = make_state().await;
    create_point(&state, "Cafe", 10.0, 20.0, user_id).await;

    let resp = send(
      state,
      "POST",
      "/points",
      Some(json!({
        "name": "Another", "latitude": 10.0, "longitude": 20.0, "user_id": user_id,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(
      json_of(resp).await["error"]
        .as_str()
        .unwrap()
        .contains("already in use")
    );
  }

  #[tokio::test]
  async fn create_for_unknown_user_is_404() {
    let (state, user_id) = make_state().await;
    let resp = send(
      state,
      "POST",
      "/points",
      Some(json!({
        "name": "Cafe", "latitude": 1.0, "longitude": 2.0, "user_id": user_id + 1,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_point_twice() {
    let (state, user_id) = make_state().await;
    let id = create_point(&state, "Cafe", 1.0, 2.0, user_id).await;

    let resp = send(
      state.clone(),
      "DELETE",
      "/points",
      Some(json!({ "point_id": id })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_of(resp).await["point_id"].as_i64().unwrap(), id);

    let resp = send(state, "DELETE", "/points", Some(json!({ "point_id": id }))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn name_search_finds_substrings() {
    let (state, user_id) = make_state().await;
    create_point(&state, "Central Cafe", 1.0, 1.0, user_id).await;
    create_point(&state, "Harbour View", 2.0, 2.0, user_id).await;

    let resp = send(state.clone(), "GET", "/points/by-name/cafe", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_of(resp).await;
    assert_eq!(body["points"].as_array().unwrap().len(), 1);

    // A blank name is invalid, not an empty search.
    let resp = send(state, "GET", "/points/by-name/%20", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Bounding box ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn within_returns_points_with_owner() {
    let (state, user_id) = make_state().await;
    create_point(&state, "inside", 5.0, 10.0, user_id).await;
    create_point(&state, "outside", 50.0, 10.0, user_id).await;

    let resp = send(
      state,
      "POST",
      "/points/within",
      Some(json!({
        "northEast": { "latitude": 10.0, "longitude": 20.0 },
        "southWest": { "latitude": 0.0, "longitude": 0.0 },
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_of(resp).await;
    let points = body["points"].as_array().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0]["name"], "inside");
    assert_eq!(points[0]["owner_email"], "alice@example.com");
  }

  #[tokio::test]
  async fn within_validates_corners() {
    let (state, _) = make_state().await;

    // Missing corner.
    let resp = send(
      state.clone(),
      "POST",
      "/points/within",
      Some(json!({ "northEast": { "latitude": 10.0, "longitude": 20.0 } })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Out-of-range longitude.
    let resp = send(
      state,
      "POST",
      "/points/within",
      Some(json!({
        "northEast": { "latitude": 10.0, "longitude": 200.0 },
        "southWest": { "latitude": 0.0, "longitude": 0.0 },
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  /// Swapped corners are accepted and match nothing.
  #[tokio::test]
  async fn within_reversed_box_is_empty() {
    let (state, user_id) = make_state().await;
    create_point(&state, "inside", 5.0, 10.0, user_id).await;

    let resp = send(
      state,
      "POST",
      "/points/within",
      Some(json!({
        "northEast": { "latitude": 0.0, "longitude": 0.0 },
        "southWest": { "latitude": 10.0, "longitude": 20.0 },
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(json_of(resp).await["points"].as_array().unwrap().is_empty());
  }

  // ── Check-ins ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn checkin_cycle_statuses() {
    let (state, user_id) = make_state().await;
    let point_id = create_point(&state, "Cafe", 1.0, 2.0, user_id).await;
    let pair = json!({ "user_id": user_id, "point_id": point_id });

    let resp = send(state.clone(), "POST", "/checkins", Some(pair.clone())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_of(resp).await;
    assert_eq!(body["interaction"]["point_id"].as_i64().unwrap(), point_id);

    // Repeat check-in conflicts.
    let resp = send(state.clone(), "POST", "/checkins", Some(pair.clone())).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Check out, then the pair is gone.
    let resp = send(state.clone(), "DELETE", "/checkins", Some(pair.clone())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(state.clone(), "DELETE", "/checkins", Some(pair.clone())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The full cycle may repeat.
    let resp = send(state, "POST", "/checkins", Some(pair)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  #[tokio::test]
  async fn checkin_validates_ids() {
    let (state, _) = make_state().await;

    let resp = send(
      state.clone(),
      "POST",
      "/checkins",
      Some(json!({ "point_id": 1 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(
      state,
      "POST",
      "/checkins",
      Some(json!({ "user_id": 1, "point_id": 0 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn checkin_info_aggregates() {
    let (state, user_id) = make_state().await;
    let point_id = create_point(&state, "Cafe", 1.0, 2.0, user_id).await;

    // Zero interactions is a result, not an error.
    let uri = format!("/checkins/info?point_id={point_id}&user_id={user_id}");
    let resp = send(state.clone(), "GET", &uri, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_of(resp).await;
    assert_eq!(body["total_interactions"].as_i64().unwrap(), 0);
    assert_eq!(body["user_interacted"], false);

    send(
      state.clone(),
      "POST",
      "/checkins",
      Some(json!({ "user_id": user_id, "point_id": point_id })),
    )
    .await;

    let resp = send(state.clone(), "GET", &uri, None).await;
    let body = json_of(resp).await;
    assert_eq!(body["total_interactions"].as_i64().unwrap(), 1);
    assert_eq!(body["user_interacted"], true);

    // Invalid ids are rejected before the store is touched.
    let resp = send(
      state.clone(),
      "GET",
      "/checkins/info?point_id=0&user_id=1",
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let resp = send(state, "GET", "/checkins/info?point_id=abc&user_id=1", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Storage-failure gating ──────────────────────────────────────────────

  #[tokio::test]
  async fn storage_failures_are_gated_by_default() {
    let (state, user_id) = make_state().await;

    // Orphan pair: the foreign key rejects it inside the store.
    let resp = send(
      state,
      "POST",
      "/checkins",
      Some(json!({ "user_id": user_id, "point_id": 999 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_of(resp).await["error"], "internal server error");
  }

  #[tokio::test]
  async fn storage_failures_pass_through_when_exposed() {
    let (state, user_id) = make_state().await;
    let state = AppState { expose_storage_errors: true, ..state };

    let resp = send(
      state,
      "POST",
      "/checkins",
      Some(json!({ "user_id": user_id, "point_id": 999 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
      json_of(resp).await["error"]
        .as_str()
        .unwrap()
        .contains("storage error")
    );
  }
}
