use hostbot_db::{PoolStatus, TaskError};

use crate::model::Recovered;

pub(crate) struct Oracle {
    idle_cap: usize,
}

impl Oracle {
    pub(crate) fn new(idle_cap: usize) -> Self {
        Self { idle_cap }
    }

    /// Pool counters against the driver's own count of unrecovered tasks.
    pub(crate) fn check(&self, status: PoolStatus, outstanding: usize) -> Result<(), String> {
        if status.outstanding != outstanding {
            return Err(format!(
                "pool reports {} outstanding tasks, driver holds {outstanding}",
                status.outstanding
            ));
        }
        if status.idle > self.idle_cap {
            return Err(format!(
                "{} idle connections exceed the cap of {}",
                status.idle, self.idle_cap
            ));
        }
        if status.total < status.idle {
            return Err(format!(
                "total {} is below the idle count {}",
                status.total, status.idle
            ));
        }
        // Each outstanding task holds at most one connection.
        if status.total > status.idle + status.outstanding {
            return Err(format!(
                "total {} exceeds idle {} plus outstanding {}",
                status.total, status.idle, status.outstanding
            ));
        }
        Ok(())
    }

    /// A task reports `ran == false` exactly when it was forced ready for lack of a worker.
    pub(crate) fn check_recovered(recovered: &Recovered) -> Result<(), String> {
        let exhausted = matches!(
            recovered.errors.as_slice(),
            [TaskError::ResourceExhaustion(_)]
        );
        if recovered.ran == exhausted {
            return Err(format!(
                "task {} ({}) ran={} with errors {:?}",
                recovered.id, recovered.kind, recovered.ran, recovered.errors
            ));
        }
        Ok(())
    }

    pub(crate) fn check_drained(status: PoolStatus) -> Result<(), String> {
        if status.outstanding != 0 || status.total != status.idle {
            return Err(format!("pool not drained after final recovery: {status}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(idle: usize, total: usize, outstanding: usize) -> PoolStatus {
        PoolStatus {
            idle,
            total,
            outstanding,
        }
    }

    #[test]
    fn accepts_consistent_counters() {
        let oracle = Oracle::new(2);
        assert!(oracle.check(status(2, 3, 1), 1).is_ok());
        assert!(oracle.check(status(0, 0, 0), 0).is_ok());
    }

    #[test]
    fn rejects_leaks_and_overflow() {
        let oracle = Oracle::new(2);
        assert!(oracle.check(status(3, 3, 0), 0).is_err());
        assert!(oracle.check(status(1, 3, 1), 1).is_err());
        assert!(oracle.check(status(1, 1, 1), 0).is_err());
    }
}
