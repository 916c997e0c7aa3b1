//! Error types for `roam-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("{0} must not be empty")]
  EmptyField(&'static str),

  #[error("{field} must be a positive integer, got {value}")]
  InvalidId {
    field: &'static str,
    value: i64,
  },

  #[error("latitude must be a finite number between -90 and 90, got {0}")]
  LatitudeOutOfRange(f64),

  #[error("longitude must be a finite number between -180 and 180, got {0}")]
  LongitudeOutOfRange(f64),

  #[error("coordinates ({latitude}, {longitude}) already in use by another point")]
  DuplicateCoordinates {
    latitude:  f64,
    longitude: f64,
  },

  #[error("user {0} not found")]
  UserNotFound(i64),

  #[error("point {0} not found")]
  PointNotFound(i64),

  #[error("user {user_id} already interacted with point {point_id}")]
  AlreadyCheckedIn {
    user_id:  i64,
    point_id: i64,
  },

  #[error("no active check-in for user {user_id} at point {point_id}")]
  CheckinNotFound {
    user_id:  i64,
    point_id: i64,
  },

  #[error("storage error: {0}")]
  Storage(String),
}

/// Coarse classification used by transport layers to pick a response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed or out-of-range input; client-caused, never retried.
  InvalidArgument,
  /// A uniqueness constraint was violated.
  Conflict,
  /// A referenced entity is absent.
  NotFound,
  /// Datastore failure with an opaque cause.
  Storage,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::MissingField(_)
      | Error::EmptyField(_)
      | Error::InvalidId { .. }
      | Error::LatitudeOutOfRange(_)
      | Error::LongitudeOutOfRange(_) => ErrorKind::InvalidArgument,

      Error::DuplicateCoordinates { .. } | Error::AlreadyCheckedIn { .. } => ErrorKind::Conflict,

      Error::UserNotFound(_) | Error::PointNotFound(_) | Error::CheckinNotFound { .. } => {
        ErrorKind::NotFound
      }

      Error::Storage(_) => ErrorKind::Storage,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
