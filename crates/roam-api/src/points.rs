//! Handlers for `/points` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/points/:id` | 404 if not found |
//! | `GET`    | `/points/by-name/:name` | ≤10 case-insensitive substring matches |
//! | `POST`   | `/points/within` | Body: bounding-box corners; ≤10 matches with owner email |
//! | `POST`   | `/points` | Body: [`CreateBody`]; returns the new point id |
//! | `DELETE` | `/points` | Body: `{"point_id":N}` |

use axum::{
  Json,
  extract::{Path, State},
};
use roam_core::{
  geo::{BoundingBox, Coordinates},
  point::{NewPoint, Point, PointWithOwner},
  store::LocationStore,
  validate,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Get one ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PointResponse {
  pub point: Point,
}

/// `GET /points/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<PointResponse>, ApiError>
where
  S: LocationStore,
{
  let id = validate::id("id", id).map_err(|e| state.domain_err(e))?;
  let point = state
    .store
    .point_by_id(id)
    .await
    .map_err(|e| state.domain_err(e))?
    .ok_or_else(|| ApiError::NotFound(format!("point {id} not found")))?;
  Ok(Json(PointResponse { point }))
}

// ─── Search by name ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PointsResponse {
  pub points: Vec<Point>,
}

/// `GET /points/by-name/:name`
pub async fn by_name<S>(
  State(state): State<AppState<S>>,
  Path(name): Path<String>,
) -> Result<Json<PointsResponse>, ApiError>
where
  S: LocationStore,
{
  let fragment = validate::name(&name).map_err(|e| state.domain_err(e))?;
  let points = state
    .store
    .points_by_name(fragment)
    .await
    .map_err(|e| state.domain_err(e))?;
  Ok(Json(PointsResponse { points }))
}

// ─── Search by bounding box ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CornerBody {
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithinBody {
  pub north_east: Option<CornerBody>,
  pub south_west: Option<CornerBody>,
}

#[derive(Debug, Serialize)]
pub struct OwnedPointsResponse {
  pub points: Vec<PointWithOwner>,
}

fn corner(
  field: &'static str,
  latitude_field: &'static str,
  longitude_field: &'static str,
  raw: Option<CornerBody>,
) -> roam_core::Result<Coordinates> {
  let raw = validate::required(field, raw)?;
  Ok(Coordinates {
    latitude:  validate::required(latitude_field, raw.latitude)?,
    longitude: validate::required(longitude_field, raw.longitude)?,
  })
}

fn parse_bounds(body: WithinBody) -> roam_core::Result<BoundingBox> {
  let north_east = corner(
    "northEast",
    "northEast.latitude",
    "northEast.longitude",
    body.north_east,
  )?;
  let south_west = corner(
    "southWest",
    "southWest.latitude",
    "southWest.longitude",
    body.south_west,
  )?;
  validate::bounding_box(north_east, south_west)
}

/// `POST /points/within` — body carries the box corners.
pub async fn within<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<WithinBody>,
) -> Result<Json<OwnedPointsResponse>, ApiError>
where
  S: LocationStore,
{
  let bounds = parse_bounds(body).map_err(|e| state.domain_err(e))?;
  let points = state
    .store
    .points_within(bounds)
    .await
    .map_err(|e| state.domain_err(e))?;
  Ok(Json(OwnedPointsResponse { points }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub latitude:    Option<f64>,
  pub longitude:   Option<f64>,
  pub user_id:     Option<i64>,
  pub color:       Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PointIdResponse {
  pub point_id: i64,
}

/// Every field is validated before any storage access.
fn parse_new_point(body: CreateBody) -> roam_core::Result<NewPoint> {
  let raw_name = validate::required("name", body.name)?;
  let name = validate::name(&raw_name)?.to_owned();
  let description = validate::optional_text("description", body.description.as_deref())?
    .map(str::to_owned);
  let latitude = validate::latitude(validate::required("latitude", body.latitude)?)?;
  let longitude = validate::longitude(validate::required("longitude", body.longitude)?)?;
  let user_id = validate::id("user_id", validate::required("user_id", body.user_id)?)?;
  let color = validate::optional_text("color", body.color.as_deref())?.map(str::to_owned);

  Ok(NewPoint { name, description, latitude, longitude, user_id, color })
}

/// `POST /points`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<Json<PointIdResponse>, ApiError>
where
  S: LocationStore,
{
  let input = parse_new_point(body).map_err(|e| state.domain_err(e))?;
  let point_id = state
    .store
    .create_point(input)
    .await
    .map_err(|e| state.domain_err(e))?;
  Ok(Json(PointIdResponse { point_id }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteBody {
  pub point_id: Option<i64>,
}

/// `DELETE /points` — body-addressed, mirroring the create payload shape.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<DeleteBody>,
) -> Result<Json<PointIdResponse>, ApiError>
where
  S: LocationStore,
{
  let point_id = validate::required("point_id", body.point_id)
    .and_then(|v| validate::id("point_id", v))
    .map_err(|e| state.domain_err(e))?;

  state
    .store
    .delete_point(point_id)
    .await
    .map_err(|e| state.domain_err(e))?;
  Ok(Json(PointIdResponse { point_id }))
}
