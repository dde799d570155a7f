use crate::connection::{Connection, ExecOutcome};
use crate::error::TaskError;
use crate::results::ResultSet;

use super::kind::OperationKind;

/// One kind of database call: its parameters, its statement(s) and its typed result.
///
/// `run` executes on a worker thread with the connection the task was lent. It never fails:
/// statement and shape problems are recorded on the [`Runner`] and the operation returns
/// whatever result it could build, falling back to [`Operation::fallback`].
pub trait Operation: Send + 'static {
    const KIND: OperationKind;

    type Output: Send + 'static;

    /// The default or sentinel result, reported when the body does not run or finds nothing.
    fn fallback(&self) -> Self::Output;

    fn run(self, runner: &mut Runner<'_>) -> Self::Output;
}

/// Worker-side statement executor handed to [`Operation::run`].
pub struct Runner<'a> {
    conn: &'a mut Connection,
    bot_id: u32,
    errors: Vec<TaskError>,
}

impl<'a> Runner<'a> {
    pub fn new(conn: &'a mut Connection, bot_id: u32) -> Self {
        Self {
            conn,
            bot_id,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn bot_id(&self) -> u32 {
        self.bot_id
    }

    /// Run a statement that returns no rows. A failure is recorded and yields `None`.
    pub fn execute(&mut self, sql: &str) -> Option<ExecOutcome> {
        match self.conn.execute(sql) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                self.errors.push(TaskError::statement(&err));
                None
            }
        }
    }

    /// Run a query. A failure is recorded and yields `None`.
    pub fn query(&mut self, sql: &str) -> Option<ResultSet> {
        match self.conn.query(sql) {
            Ok(rows) => Some(rows),
            Err(err) => {
                self.errors.push(TaskError::statement(&err));
                None
            }
        }
    }

    /// Record a row that did not have the expected column count.
    pub fn shape_error(&mut self, message: impl Into<String>) {
        self.errors.push(TaskError::Shape(message.into()));
    }

    #[must_use]
    pub fn errors(&self) -> &[TaskError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<TaskError> {
        self.errors
    }
}
