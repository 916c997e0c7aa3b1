//! Timestamp helpers between [`chrono`] types and the RFC 3339 strings
//! stored in SQLite columns.

use chrono::{DateTime, Utc};
use roam_core::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Storage(format!("bad timestamp {s:?}: {e}")))
}
