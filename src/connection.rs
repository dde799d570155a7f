use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::DbError;
use crate::results::ResultSet;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Rows inserted, updated or deleted
    pub rows_affected: u64,
    /// Row id generated by the most recent successful insert on this session
    pub last_insert_id: u64,
}

/// One live session with the database.
///
/// A session is used by at most one thread at a time: it either sits idle in the pool or is
/// owned by the worker running a single task. Implementations only need `Send`.
pub trait Session: Send {
    /// Cheap liveness probe.
    ///
    /// # Errors
    /// Returns [`DbError`] when the session is no longer usable.
    fn ping(&mut self) -> Result<(), DbError>;

    /// Run exactly one statement that returns no rows.
    ///
    /// # Errors
    /// Returns [`DbError`] if the database rejects the statement.
    fn execute(&mut self, sql: &str) -> Result<ExecOutcome, DbError>;

    /// Run exactly one statement and buffer every row it returns.
    ///
    /// # Errors
    /// Returns [`DbError`] if the database rejects the statement or a row cannot be decoded.
    fn query(&mut self, sql: &str) -> Result<ResultSet, DbError>;

    /// Release the session. The default just drops it.
    fn close(self: Box<Self>) {}
}

/// Opens new sessions. Shared between the owner and every worker.
pub trait Connector: Send + Sync + 'static {
    /// Open a fresh connection.
    ///
    /// # Errors
    /// Returns [`DbError::ConnectionError`] (or a driver error) if the server cannot be reached.
    fn connect(&self) -> Result<Connection, DbError>;

    /// Human-readable target, used in log lines.
    fn describe(&self) -> String;
}

/// Owned handle to one session.
///
/// Not `Clone`: the pool, a task and the worker running it hand the handle along by move, so a
/// session is never reachable from two places at once.
pub struct Connection {
    id: u64,
    session: Box<dyn Session>,
}

impl Connection {
    #[must_use]
    pub fn new(session: Box<dyn Session>) -> Self {
        Self {
            id: NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            session,
        }
    }

    /// Process-unique identity of this connection.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// # Errors
    /// See [`Session::ping`].
    pub fn ping(&mut self) -> Result<(), DbError> {
        self.session.ping()
    }

    /// # Errors
    /// See [`Session::execute`].
    pub fn execute(&mut self, sql: &str) -> Result<ExecOutcome, DbError> {
        self.session.execute(sql)
    }

    /// # Errors
    /// See [`Session::query`].
    pub fn query(&mut self, sql: &str) -> Result<ResultSet, DbError> {
        self.session.query(sql)
    }

    pub fn close(self) {
        self.session.close();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("id", &self.id).finish()
    }
}
