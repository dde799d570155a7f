use std::fmt;

use serde::Serialize;

/// Snapshot of the pool counters, for operational visibility only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    /// Connections parked in the idle queue
    pub idle: usize,
    /// Connections believed to exist, idle or lent to a task
    pub total: usize,
    /// Tasks dispatched and not yet recovered
    pub outstanding: usize,
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DB STATUS --- Connections: {}/{} idle. Outstanding tasks: {}.",
            self.idle, self.total, self.outstanding
        )
    }
}
