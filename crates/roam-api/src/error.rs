//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roam_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("internal error: {detail}")]
  Internal {
    detail: String,
    /// Pass the underlying message through to the client. Off outside
    /// local debugging; the full error is always logged.
    expose: bool,
  },
}

impl ApiError {
  /// Translate a domain failure into its wire representation.
  ///
  /// One mapping is irregular on purpose: duplicate coordinates answer 400
  /// while a duplicate interaction answers 409. Both are conflicts in the
  /// taxonomy; the interface contract splits them.
  pub fn from_domain(err: roam_core::Error, expose_storage: bool) -> Self {
    match err.kind() {
      ErrorKind::InvalidArgument => ApiError::BadRequest(err.to_string()),
      ErrorKind::Conflict => match err {
        roam_core::Error::DuplicateCoordinates { .. } => {
          ApiError::BadRequest(err.to_string())
        }
        _ => ApiError::Conflict(err.to_string()),
      },
      ErrorKind::NotFound => ApiError::NotFound(err.to_string()),
      ErrorKind::Storage => ApiError::Internal {
        detail: err.to_string(),
        expose: expose_storage,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::Internal { detail, expose } => {
        tracing::error!(error = %detail, "storage failure");
        let message = if expose {
          detail
        } else {
          "internal server error".to_string()
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message)
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
