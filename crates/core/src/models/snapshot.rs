use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schedule of the backend's periodic portfolio snapshots
/// (`GET /reports/snapshot-status/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStatus {
    pub frequency_minutes: u32,
    pub last_snapshot: Option<DateTime<Utc>>,
    pub next_snapshot: Option<DateTime<Utc>>,
}

impl SnapshotStatus {
    /// Whole minutes until the next snapshot, saturating at 0 once it is due.
    /// `None` when the backend has nothing scheduled.
    pub fn minutes_until_next(&self, now: DateTime<Utc>) -> Option<i64> {
        self.next_snapshot
            .map(|next| (next - now).num_minutes().max(0))
    }

    /// Minutes since the last snapshot was taken.
    pub fn minutes_since_last(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_snapshot
            .map(|last| (now - last).num_minutes().max(0))
    }
}
