use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;

/// Errors raised by the owner-side API and the backend drivers.
#[derive(Debug, Error)]
pub enum DbError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Worker spawn error: {0}")]
    WorkerSpawn(String),

    #[error("Other database error: {0}")]
    Other(String),
}

/// A failure recorded on a task while its worker ran.
///
/// Task errors never propagate across the worker boundary as `Err`; they travel inside the
/// task's completion record and are inspected by the owner after recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Opening or probing the connection failed; the statement body never ran.
    #[error("connection error: {0}")]
    Connection(String),

    /// A statement was rejected by the database.
    #[error("statement error: {0}")]
    Statement(String),

    /// A result row did not have the expected number of columns.
    #[error("{0}")]
    Shape(String),

    /// No worker could be started for the task.
    #[error("worker could not be spawned: {0}")]
    ResourceExhaustion(String),

    /// The worker ended without publishing a result.
    #[error("worker exited before completing the task")]
    WorkerLost,
}

impl TaskError {
    pub(crate) fn connection(err: &DbError) -> Self {
        TaskError::Connection(driver_message(err))
    }

    pub(crate) fn statement(err: &DbError) -> Self {
        TaskError::Statement(driver_message(err))
    }
}

// The task error already names its category, so strip the DbError prefix.
fn driver_message(err: &DbError) -> String {
    match err {
        #[cfg(feature = "sqlite")]
        DbError::SqliteError(inner) => inner.to_string(),
        DbError::ConfigError(msg)
        | DbError::ConnectionError(msg)
        | DbError::ExecutionError(msg)
        | DbError::WorkerSpawn(msg)
        | DbError::Other(msg) => msg.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_error_keeps_driver_text_without_category_prefix() {
        let err = DbError::ExecutionError("no such table: admins".into());
        assert_eq!(
            TaskError::statement(&err).to_string(),
            "statement error: no such table: admins"
        );
        let err = DbError::ConnectionError("refused".into());
        assert_eq!(TaskError::connection(&err).to_string(), "connection error: refused");
    }
}
