//! Handlers for `/checkins` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/checkins` | Body: `{"user_id":N,"point_id":N}`; 201, or 409 if already active |
//! | `DELETE` | `/checkins` | Same body; 404 if no active interaction |
//! | `GET`    | `/checkins/info?point_id&user_id` | Aggregate; an empty ledger is zero, not 404 |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use roam_core::{
  checkin::{Checkin, CheckinSummary},
  store::LocationStore,
  validate,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct PairBody {
  pub user_id:  Option<i64>,
  pub point_id: Option<i64>,
}

fn parse_pair(body: PairBody) -> roam_core::Result<(i64, i64)> {
  let user_id = validate::id("user_id", validate::required("user_id", body.user_id)?)?;
  let point_id =
    validate::id("point_id", validate::required("point_id", body.point_id)?)?;
  Ok((user_id, point_id))
}

// ─── Check in ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct InteractionResponse {
  pub interaction: Checkin,
}

/// `POST /checkins`
pub async fn check_in<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<PairBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LocationStore,
{
  let (user_id, point_id) = parse_pair(body).map_err(|e| state.domain_err(e))?;
  let interaction = state
    .store
    .check_in(user_id, point_id)
    .await
    .map_err(|e| state.domain_err(e))?;
  Ok((StatusCode::CREATED, Json(InteractionResponse { interaction })))
}

// ─── Check out ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
  pub user_id:  i64,
  pub point_id: i64,
}

/// `DELETE /checkins`
pub async fn check_out<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<PairBody>,
) -> Result<Json<CheckoutResponse>, ApiError>
where
  S: LocationStore,
{
  let (user_id, point_id) = parse_pair(body).map_err(|e| state.domain_err(e))?;
  state
    .store
    .check_out(user_id, point_id)
    .await
    .map_err(|e| state.domain_err(e))?;
  Ok(Json(CheckoutResponse { user_id, point_id }))
}

// ─── Aggregate ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InfoParams {
  pub point_id: i64,
  pub user_id:  i64,
}

/// `GET /checkins/info?point_id=<id>&user_id=<id>`
pub async fn info<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<InfoParams>,
) -> Result<Json<CheckinSummary>, ApiError>
where
  S: LocationStore,
{
  let point_id = validate::id("point_id", params.point_id)
    .map_err(|e| state.domain_err(e))?;
  let user_id = validate::id("user_id", params.user_id)
    .map_err(|e| state.domain_err(e))?;

  let summary = state
    .store
    .checkin_summary(point_id, user_id)
    .await
    .map_err(|e| state.domain_err(e))?;
  Ok(Json(summary))
}
