//! Check-in — the ledger entry recording a user's interaction with a point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An active interaction between a user and a point.
/// At most one exists per `(user_id, point_id)` pair at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkin {
  pub id:         i64,
  pub user_id:    i64,
  pub point_id:   i64,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
}

/// Point-level aggregate over the ledger.
///
/// An empty ledger reads as zero interactions, not as a missing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinSummary {
  pub total_interactions: i64,
  pub user_interacted:    bool,
}
