//! Point of interest — a geotagged place owned by a user.

use serde::{Deserialize, Serialize};

/// A stored point of interest. Never mutated; created once, deleted by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
  pub id:          i64,
  pub name:        String,
  pub description: Option<String>,
  pub latitude:    f64,
  pub longitude:   f64,
  /// Owner; references an existing user at creation time.
  pub user_id:     i64,
  /// Display color chosen by the owner, e.g. `"#ff4400"`.
  pub color:       Option<String>,
}

/// Input to [`crate::store::LocationStore::create_point`].
/// The id is always assigned by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewPoint {
  pub name:        String,
  pub description: Option<String>,
  pub latitude:    f64,
  pub longitude:   f64,
  pub user_id:     i64,
  pub color:       Option<String>,
}

/// A point joined with its owner's email, as returned by bounding-box
/// search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointWithOwner {
  #[serde(flatten)]
  pub point:       Point,
  pub owner_email: String,
}
