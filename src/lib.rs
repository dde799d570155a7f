//! Non-blocking database access for a single-threaded game host bot.
//!
//! The owner thread submits an operation and gets a [`Task`] back at once. Each task runs on
//! its own worker with a connection lent from the [`Database`]'s idle pool, and the owner polls
//! it and hands it back through [`Database::recover`] once it is ready.

pub mod config;
pub mod connection;
pub mod database;
pub mod dispatch;
pub mod error;
pub mod ops;
pub mod pool;
pub mod prelude;
pub mod query_utils;
pub mod results;
pub mod statement;
pub mod task;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{DatabaseOptions, DatabaseOptionsBuilder};
pub use connection::{Connection, Connector, ExecOutcome, Session};
pub use database::Database;
pub use dispatch::{Spawn, ThreadSpawner, WorkerBody};
pub use error::{DbError, TaskError};
pub use pool::PoolStatus;
pub use results::{ResultSet, TextRow};
pub use task::{Operation, OperationKind, Runner, Task, TaskId, TaskOutcome};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConnector, SqliteOptions, SqliteOptionsBuilder};
