//! [`SqliteStore`] — the SQLite implementation of [`LocationStore`].

use std::path::Path;

use chrono::Utc;
use roam_core::{
  Error, Result,
  checkin::{Checkin, CheckinSummary},
  geo::BoundingBox,
  point::{NewPoint, Point, PointWithOwner},
  store::{LocationStore, SEARCH_LIMIT},
};
use rusqlite::OptionalExtension as _;

use crate::{
  encode::{decode_dt, encode_dt},
  schema::SCHEMA,
};

// ─── Error mapping ───────────────────────────────────────────────────────────

/// Fold a driver failure into the shared taxonomy.
fn storage(err: tokio_rusqlite::Error) -> Error {
  Error::Storage(err.to_string())
}

fn extended_code(err: &tokio_rusqlite::Error) -> Option<i32> {
  match err {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)) => {
      Some(e.extended_code)
    }
    _ => None,
  }
}

/// A UNIQUE index rejected the write.
fn unique_violation(err: &tokio_rusqlite::Error) -> bool {
  extended_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}

/// A foreign key rejected the write.
fn foreign_key_violation(err: &tokio_rusqlite::Error) -> bool {
  extended_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

// ─── Row mapping ─────────────────────────────────────────────────────────────

/// Column list shared by every point-returning query, in
/// [`point_from_row`] order.
const POINT_COLUMNS: &str =
  "id, name, description, latitude, longitude, user_id, color";

fn point_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Point> {
  Ok(Point {
    id:          row.get(0)?,
    name:        row.get(1)?,
    description: row.get(2)?,
    latitude:    row.get(3)?,
    longitude:   row.get(4)?,
    user_id:     row.get(5)?,
    color:       row.get(6)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roam point store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(storage)
  }

  /// Insert a user row and return its id.
  ///
  /// Not part of [`LocationStore`]: user provisioning belongs to the
  /// authentication service that shares this database. Exposed for
  /// integration tests and local bootstrap.
  pub async fn seed_user(
    &self,
    username: &str,
    email: &str,
    password_hash: &str,
  ) -> Result<i64> {
    let username = username.to_owned();
    let email = email.to_owned();
    let password_hash = password_hash.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3)",
          rusqlite::params![username, email, password_hash],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(storage)
  }

  /// First point holding the exact coordinate pair, if any.
  async fn point_at(&self, latitude: f64, longitude: f64) -> Result<Option<Point>> {
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {POINT_COLUMNS} FROM points
                 WHERE latitude = ?1 AND longitude = ?2 LIMIT 1"
              ),
              rusqlite::params![latitude, longitude],
              point_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(storage)
  }

  /// The active ledger row for the pair, if any.
  async fn checkin_for(&self, user_id: i64, point_id: i64) -> Result<Option<Checkin>> {
    let raw: Option<(i64, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, created_at FROM checkins
               WHERE user_id = ?1 AND point_id = ?2 LIMIT 1",
              rusqlite::params![user_id, point_id],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await
      .map_err(storage)?;

    raw
      .map(|(id, created_at)| {
        Ok(Checkin {
          id,
          user_id,
          point_id,
          created_at: decode_dt(&created_at)?,
        })
      })
      .transpose()
  }
}

// ─── LocationStore impl ──────────────────────────────────────────────────────

impl LocationStore for SqliteStore {
  // ── Point repository ──────────────────────────────────────────────────────

  async fn point_by_id(&self, id: i64) -> Result<Option<Point>> {
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {POINT_COLUMNS} FROM points WHERE id = ?1 LIMIT 1"),
              rusqlite::params![id],
              point_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(storage)
  }

  async fn points_by_name(&self, fragment: &str) -> Result<Vec<Point>> {
    // SQLite LIKE is case-insensitive for ASCII, matching the contract.
    let pattern = format!("%{fragment}%");

    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {POINT_COLUMNS} FROM points WHERE name LIKE ?1 LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![pattern, SEARCH_LIMIT as i64],
            point_from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(storage)
  }

  async fn points_within(&self, bounds: BoundingBox) -> Result<Vec<PointWithOwner>> {
    // BETWEEN with swapped bounds matches nothing; a reversed box falls
    // out empty here rather than erroring.
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.id, p.name, p.description, p.latitude, p.longitude,
                  p.user_id, p.color, u.email
           FROM points p
           JOIN users u ON u.id = p.user_id
           WHERE p.latitude  BETWEEN ?1 AND ?2
             AND p.longitude BETWEEN ?3 AND ?4
           LIMIT ?5",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              bounds.south_west.latitude,
              bounds.north_east.latitude,
              bounds.south_west.longitude,
              bounds.north_east.longitude,
              SEARCH_LIMIT as i64,
            ],
            |row| {
              Ok(PointWithOwner {
                point:       point_from_row(row)?,
                owner_email: row.get(7)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(storage)
  }

  async fn create_point(&self, input: NewPoint) -> Result<i64> {
    // Fast-path checks for precise errors; the unique index and foreign
    // key below remain authoritative.
    if self.point_at(input.latitude, input.longitude).await?.is_some() {
      return Err(Error::DuplicateCoordinates {
        latitude:  input.latitude,
        longitude: input.longitude,
      });
    }
    if !self.user_exists(input.user_id).await? {
      return Err(Error::UserNotFound(input.user_id));
    }

    let (latitude, longitude, user_id) =
      (input.latitude, input.longitude, input.user_id);

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO points (name, description, latitude, longitude, user_id, color)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            input.name,
            input.description,
            input.latitude,
            input.longitude,
            input.user_id,
            input.color,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await;

    match inserted {
      Ok(id) => Ok(id),
      // Lost the race after the pre-checks: surface the same errors the
      // pre-checks would have produced.
      Err(ref e) if unique_violation(e) => {
        Err(Error::DuplicateCoordinates { latitude, longitude })
      }
      Err(ref e) if foreign_key_violation(e) => Err(Error::UserNotFound(user_id)),
      Err(e) => Err(storage(e)),
    }
  }

  async fn delete_point(&self, point_id: i64) -> Result<()> {
    if self.point_by_id(point_id).await?.is_none() {
      return Err(Error::PointNotFound(point_id));
    }

    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM points WHERE id = ?1", rusqlite::params![point_id])?;
        Ok(())
      })
      .await
      .map_err(storage)
  }

  async fn user_exists(&self, user_id: i64) -> Result<bool> {
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM users WHERE id = ?1",
              rusqlite::params![user_id],
              |_| Ok(()),
            )
            .optional()?
            .is_some(),
        )
      })
      .await
      .map_err(storage)
  }

  // ── Check-in ledger ───────────────────────────────────────────────────────

  async fn check_in(&self, user_id: i64, point_id: i64) -> Result<Checkin> {
    if self.checkin_for(user_id, point_id).await?.is_some() {
      return Err(Error::AlreadyCheckedIn { user_id, point_id });
    }

    let created_at = Utc::now();
    let created_at_str = encode_dt(created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO checkins (user_id, point_id, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![user_id, point_id, created_at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await;

    match inserted {
      Ok(id) => Ok(Checkin { id, user_id, point_id, created_at }),
      Err(ref e) if unique_violation(e) => {
        Err(Error::AlreadyCheckedIn { user_id, point_id })
      }
      // Orphan user/point pairs are rejected by the foreign keys and stay
      // generic storage failures; existence checks are not part of this
      // operation's contract.
      Err(e) => Err(storage(e)),
    }
  }

  async fn check_out(&self, user_id: i64, point_id: i64) -> Result<()> {
    if self.checkin_for(user_id, point_id).await?.is_none() {
      return Err(Error::CheckinNotFound { user_id, point_id });
    }

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM checkins WHERE user_id = ?1 AND point_id = ?2",
          rusqlite::params![user_id, point_id],
        )?;
        Ok(())
      })
      .await
      .map_err(storage)
  }

  async fn checkin_summary(&self, point_id: i64, user_id: i64) -> Result<CheckinSummary> {
    self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(id),
                  MAX(CASE WHEN user_id = ?2 THEN 1 ELSE 0 END)
           FROM checkins
           WHERE point_id = ?1",
          rusqlite::params![point_id, user_id],
          |row| {
            let total: i64 = row.get(0)?;
            // MAX over an empty set is NULL.
            let interacted: Option<i64> = row.get(1)?;
            Ok(CheckinSummary {
              total_interactions: total,
              user_interacted:    interacted == Some(1),
            })
          },
        )?)
      })
      .await
      .map_err(storage)
  }
}
