//! The [`LocationStore`] trait and the shared search cap.
//!
//! The trait is implemented by storage backends (e.g. `roam-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  checkin::{Checkin, CheckinSummary},
  error::Result,
  geo::BoundingBox,
  point::{NewPoint, Point, PointWithOwner},
};

/// Result cap applied to every multi-row point search.
pub const SEARCH_LIMIT: usize = 10;

/// Abstraction over the point repository and the check-in ledger.
///
/// Errors are the shared [`crate::Error`] taxonomy rather than a
/// backend-specific type: the transport layer has to tell conflicts and
/// missing entities apart, so those distinctions must survive this seam.
/// Backends fold their native failures into [`crate::Error::Storage`].
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait LocationStore: Send + Sync {
  // ── Point repository ──────────────────────────────────────────────────

  /// Retrieve a point by id. Returns `None` if not found.
  fn point_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Point>>> + Send + '_;

  /// Case-insensitive substring search on point names.
  /// Returns at most [`SEARCH_LIMIT`] rows in storage order.
  fn points_by_name<'a>(
    &'a self,
    fragment: &'a str,
  ) -> impl Future<Output = Result<Vec<Point>>> + Send + 'a;

  /// All points inside `bounds`, inclusive on both axes, each joined with
  /// its owner's email. Returns at most [`SEARCH_LIMIT`] rows.
  fn points_within(
    &self,
    bounds: BoundingBox,
  ) -> impl Future<Output = Result<Vec<PointWithOwner>>> + Send + '_;

  /// Persist a new point and return its storage-assigned id.
  ///
  /// Fails [`DuplicateCoordinates`](crate::Error::DuplicateCoordinates) if
  /// another point holds the exact coordinate pair, and
  /// [`UserNotFound`](crate::Error::UserNotFound) if the owner does not
  /// exist. The storage unique index is authoritative: a constraint
  /// violation at insert time maps to the same conflict error.
  fn create_point(
    &self,
    input: NewPoint,
  ) -> impl Future<Output = Result<i64>> + Send + '_;

  /// Delete a point by id, along with its ledger rows.
  /// Fails [`PointNotFound`](crate::Error::PointNotFound) if absent.
  fn delete_point(
    &self,
    point_id: i64,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Whether a user row exists. Users are owned by the authentication
  /// service; this subsystem only reads them.
  fn user_exists(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  // ── Check-in ledger ───────────────────────────────────────────────────

  /// Record an interaction between `user_id` and `point_id` and return the
  /// stored row.
  ///
  /// Fails [`AlreadyCheckedIn`](crate::Error::AlreadyCheckedIn) if the pair
  /// is already active. Entity existence is not pre-checked: an orphan pair
  /// is rejected by the storage foreign keys and surfaces as
  /// [`Storage`](crate::Error::Storage).
  fn check_in(
    &self,
    user_id: i64,
    point_id: i64,
  ) -> impl Future<Output = Result<Checkin>> + Send + '_;

  /// Remove the active interaction for the pair.
  /// Fails [`CheckinNotFound`](crate::Error::CheckinNotFound) if absent.
  fn check_out(
    &self,
    user_id: i64,
    point_id: i64,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Aggregate the ledger for one point: total interactions, and whether
  /// `user_id` is among them. An empty ledger yields zero/false.
  fn checkin_summary(
    &self,
    point_id: i64,
    user_id: i64,
  ) -> impl Future<Output = Result<CheckinSummary>> + Send + '_;
}
