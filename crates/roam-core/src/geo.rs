//! Geographic primitives shared by queries and the wire format.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub latitude:  f64,
  pub longitude: f64,
}

/// Rectangle defined by its north-east and south-west corners.
///
/// Corner ordering is not enforced: a box whose corners are swapped is a
/// valid value whose latitude and longitude ranges are simply empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
  pub north_east: Coordinates,
  pub south_west: Coordinates,
}

impl BoundingBox {
  /// Inclusive containment on both axes.
  pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
    (self.south_west.latitude..=self.north_east.latitude).contains(&latitude)
      && (self.south_west.longitude..=self.north_east.longitude).contains(&longitude)
  }
}
