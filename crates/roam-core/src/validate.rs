//! Input validation — pure guards run before any storage access.
//!
//! Each function either returns the normalized value or a typed [`Error`];
//! callers report failures to the client without retrying.

use crate::{
  error::{Error, Result},
  geo::{BoundingBox, Coordinates},
};

/// Reject a missing field.
pub fn required<T>(field: &'static str, value: Option<T>) -> Result<T> {
  value.ok_or(Error::MissingField(field))
}

/// An identifier must be a positive integer.
pub fn id(field: &'static str, value: i64) -> Result<i64> {
  if value > 0 {
    Ok(value)
  } else {
    Err(Error::InvalidId { field, value })
  }
}

/// A name must have non-whitespace content; surrounding whitespace is
/// stripped before storage.
pub fn name(value: &str) -> Result<&str> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    Err(Error::EmptyField("name"))
  } else {
    Ok(trimmed)
  }
}

/// Optional text fields (`description`, `color`) may be absent, but a
/// present value must not be blank.
pub fn optional_text<'a>(
  field: &'static str,
  value: Option<&'a str>,
) -> Result<Option<&'a str>> {
  match value {
    None => Ok(None),
    Some(raw) => {
      let trimmed = raw.trim();
      if trimmed.is_empty() {
        Err(Error::EmptyField(field))
      } else {
        Ok(Some(trimmed))
      }
    }
  }
}

/// Latitude must be finite and within [-90, 90].
pub fn latitude(value: f64) -> Result<f64> {
  if value.is_finite() && (-90.0..=90.0).contains(&value) {
    Ok(value)
  } else {
    Err(Error::LatitudeOutOfRange(value))
  }
}

/// Longitude must be finite and within [-180, 180].
pub fn longitude(value: f64) -> Result<f64> {
  if value.is_finite() && (-180.0..=180.0).contains(&value) {
    Ok(value)
  } else {
    Err(Error::LongitudeOutOfRange(value))
  }
}

/// Validate both corners of a bounding box.
///
/// Corner ordering is deliberately not checked: a box with swapped corners
/// is accepted and yields an empty range downstream.
pub fn bounding_box(
  north_east: Coordinates,
  south_west: Coordinates,
) -> Result<BoundingBox> {
  latitude(north_east.latitude)?;
  longitude(north_east.longitude)?;
  latitude(south_west.latitude)?;
  longitude(south_west.longitude)?;
  Ok(BoundingBox { north_east, south_west })
}
