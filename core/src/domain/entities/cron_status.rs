//! Poller liveness heartbeat entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last-run record for a named background job, written on every tick
/// regardless of outcome and read externally for liveness dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronStatus {
    /// Unique job name
    pub name: String,

    /// Timestamp of the last execution
    pub last_run: Option<DateTime<Utc>>,
}
