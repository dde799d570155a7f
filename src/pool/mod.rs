//! Idle-connection cache and the counters that go with it.
//!
//! The pool is owned by a single thread (the one that holds the [`Database`](crate::Database)).
//! Every method takes `&self` or `&mut self` on that owner, so the queue and counters need no
//! locking. Workers never see the pool; they only ever hold the [`Connection`] they were lent.

pub mod types;

use std::collections::VecDeque;

use tracing::warn;

use crate::connection::Connection;

pub use types::PoolStatus;

/// Bounded FIFO of idle connections plus total and outstanding counters.
///
/// Invariants: `idle.len() <= idle_cap`, `total >= idle.len()`. The cap bounds idle handles
/// only; connections lent to running tasks are not limited.
#[derive(Debug)]
pub struct ConnectionPool {
    idle: VecDeque<Connection>,
    idle_cap: usize,
    total: usize,
    outstanding: usize,
}

impl ConnectionPool {
    #[must_use]
    pub fn new(idle_cap: usize) -> Self {
        Self {
            idle: VecDeque::with_capacity(idle_cap),
            idle_cap,
            total: 0,
            outstanding: 0,
        }
    }

    /// Add a connection the owner opened itself (the startup connection).
    pub fn adopt(&mut self, conn: Connection) {
        self.total += 1;
        self.release(conn);
    }

    /// Take the oldest idle connection, if any.
    ///
    /// Never opens a connection. A caller that gets `None` opens one lazily and must call
    /// [`ConnectionPool::note_lazy_open`].
    pub fn acquire(&mut self) -> Option<Connection> {
        self.idle.pop_front()
    }

    /// Count a connection that a worker is about to open.
    pub fn note_lazy_open(&mut self) {
        self.total += 1;
    }

    /// Return a connection to the back of the idle queue, or close it when the queue is full.
    pub fn release(&mut self, conn: Connection) {
        if self.idle.len() < self.idle_cap {
            self.idle.push_back(conn);
        } else {
            self.discard(conn);
        }
    }

    /// Close a connection and drop it from the total.
    pub fn discard(&mut self, conn: Connection) {
        conn.close();
        self.forget();
    }

    /// Drop a counted connection that never materialized (its worker failed to open it).
    pub fn forget(&mut self) {
        self.total = self.total.saturating_sub(1);
    }

    pub(crate) fn task_dispatched(&mut self) {
        self.outstanding += 1;
    }

    /// Count one recovered task. Returns `false` (and leaves the counter at zero) if nothing
    /// was outstanding.
    pub(crate) fn task_recovered(&mut self) -> bool {
        if self.outstanding == 0 {
            warn!("recovered a task with zero outstanding");
            false
        } else {
            self.outstanding -= 1;
            true
        }
    }

    #[must_use]
    pub fn idle_len(&self) -> usize {
        self.idle.len()
    }

    #[must_use]
    pub fn idle_cap(&self) -> usize {
        self.idle_cap
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    #[must_use]
    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            idle: self.idle.len(),
            total: self.total,
            outstanding: self.outstanding,
        }
    }

    /// Close every idle connection. Returns how many were closed.
    pub fn close_idle(&mut self) -> usize {
        let mut closed = 0;
        while let Some(conn) = self.idle.pop_front() {
            self.discard(conn);
            closed += 1;
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ExecOutcome, Session};
    use crate::error::DbError;
    use crate::results::ResultSet;

    struct NullSession;

    impl Session for NullSession {
        fn ping(&mut self) -> Result<(), DbError> {
            Ok(())
        }

        fn execute(&mut self, _sql: &str) -> Result<ExecOutcome, DbError> {
            Ok(ExecOutcome::default())
        }

        fn query(&mut self, _sql: &str) -> Result<ResultSet, DbError> {
            Ok(ResultSet::default())
        }
    }

    fn conn() -> Connection {
        Connection::new(Box::new(NullSession))
    }

    #[test]
    fn acquire_is_fifo() {
        let mut pool = ConnectionPool::new(30);
        let first = conn();
        let second = conn();
        let (first_id, second_id) = (first.id(), second.id());
        pool.adopt(first);
        pool.adopt(second);
        assert_eq!(pool.acquire().map(|c| c.id()), Some(first_id));
        assert_eq!(pool.acquire().map(|c| c.id()), Some(second_id));
        assert!(pool.acquire().is_none());
    }

    #[test]
    fn acquire_then_release_round_trips_idle_len() {
        let mut pool = ConnectionPool::new(30);
        for _ in 0..3 {
            pool.adopt(conn());
        }
        let before = pool.status();
        let c = pool.acquire().expect("idle connection");
        pool.release(c);
        assert_eq!(pool.status(), before);
    }

    #[test]
    fn release_at_cap_closes_and_decrements_total() {
        let mut pool = ConnectionPool::new(2);
        pool.adopt(conn());
        pool.adopt(conn());
        for _ in 0..3 {
            pool.note_lazy_open();
        }
        assert_eq!(pool.total(), 5);

        let mut last_total = pool.total();
        for _ in 0..3 {
            pool.release(conn());
            assert_eq!(pool.idle_len(), 2);
            assert!(pool.total() < last_total);
            last_total = pool.total();
        }
        assert_eq!(pool.total(), 2);
    }

    #[test]
    fn outstanding_never_goes_negative() {
        let mut pool = ConnectionPool::new(30);
        assert!(!pool.task_recovered());
        assert_eq!(pool.outstanding(), 0);
        pool.task_dispatched();
        pool.task_dispatched();
        assert!(pool.task_recovered());
        assert_eq!(pool.outstanding(), 1);
    }

    #[test]
    fn forget_saturates_at_zero() {
        let mut pool = ConnectionPool::new(30);
        pool.forget();
        assert_eq!(pool.total(), 0);
    }

    #[test]
    fn close_idle_empties_queue() {
        let mut pool = ConnectionPool::new(30);
        pool.adopt(conn());
        pool.adopt(conn());
        pool.note_lazy_open();
        assert_eq!(pool.close_idle(), 2);
        assert_eq!(pool.status().to_string(), "DB STATUS --- Connections: 0/1 idle. Outstanding tasks: 0.");
    }
}
