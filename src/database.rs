//! The application-facing handle: submit operations, recover finished tasks, report status.

mod catalog;

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::DatabaseOptions;
use crate::connection::Connector;
use crate::dispatch::{Dispatcher, Spawn, ThreadSpawner};
use crate::error::DbError;
use crate::pool::{ConnectionPool, PoolStatus};
use crate::task::worker::TaskJob;
use crate::task::{Operation, OwnerId, Task, TaskId, TaskOutcome};

use tokio::sync::oneshot;

/// Asynchronous database front end for a single owner thread.
///
/// Every submission returns a [`Task`] immediately and runs on its own worker. The owner polls
/// the task and hands it back through [`Database::recover`], which returns the connection to
/// the pool and settles the counters. Methods take `&mut self`, so the pool is only ever
/// touched by whoever holds the `Database`.
pub struct Database {
    id: OwnerId,
    connector: Arc<dyn Connector>,
    pool: ConnectionPool,
    dispatcher: Dispatcher,
    options: DatabaseOptions,
    next_task: u64,
}

impl Database {
    /// Open the database, connecting once up front so a bad target fails here rather than on
    /// the first task.
    ///
    /// # Errors
    /// Returns [`DbError::ConfigError`] for invalid options, or the connector's error when the
    /// startup connection cannot be opened.
    pub fn open<C: Connector>(connector: C, options: DatabaseOptions) -> Result<Self, DbError> {
        Self::with_spawner(Arc::new(connector), options, Arc::new(ThreadSpawner))
    }

    /// [`Database::open`] with a caller-supplied way of starting workers.
    ///
    /// # Errors
    /// See [`Database::open`].
    pub fn with_spawner(
        connector: Arc<dyn Connector>,
        options: DatabaseOptions,
        spawner: Arc<dyn Spawn>,
    ) -> Result<Self, DbError> {
        options.validate()?;
        info!(target_db = %connector.describe(), "opening database connection");
        let conn = connector.connect()?;

        let mut pool = ConnectionPool::new(options.idle_cap);
        pool.adopt(conn);
        let dispatcher = Dispatcher::new(
            spawner,
            options.spawn_retry_delay(),
            options.worker_name_prefix.clone(),
        );

        Ok(Self {
            id: OwnerId::next(),
            connector,
            pool,
            dispatcher,
            options,
            next_task: 1,
        })
    }

    /// Dispatch `op` on a new worker and return its task without waiting.
    ///
    /// The worker is lent the oldest idle connection; when the pool is empty it opens one
    /// itself. If no worker can be started the task is ready at once, with
    /// [`TaskError::ResourceExhaustion`](crate::TaskError::ResourceExhaustion) recorded.
    pub fn submit<O: Operation>(&mut self, op: O) -> Task<O> {
        let id = TaskId(self.next_task);
        self.next_task += 1;

        let conn = self.pool.acquire();
        if conn.is_none() {
            self.pool.note_lazy_open();
        }
        debug!(task = %id, kind = %O::KIND, lent = conn.is_some(), "dispatching task");

        let (respond_to, receiver) = oneshot::channel();
        let fallback = op.fallback();
        let job = TaskJob {
            op,
            conn,
            connector: Arc::clone(&self.connector),
            bot_id: self.options.bot_id,
            respond_to,
        };
        let label = format!("{}-{}", O::KIND, id.0);
        if let Err(err) = self.dispatcher.dispatch(&label, Box::new(job)) {
            error!(task = %id, kind = %O::KIND, "task abandoned: {err}");
        }
        self.pool.task_dispatched();

        Task::new(id, self.id, receiver, fallback)
    }

    /// Reclaim a ready task: return or discard its connection and settle the counters.
    ///
    /// Call exactly once per task. A task that is not ready yet, or that was submitted to a
    /// different `Database`, is handed back untouched as `Err`.
    pub fn recover<O: Operation>(
        &mut self,
        mut task: Task<O>,
    ) -> Result<TaskOutcome<O::Output>, Task<O>> {
        if task.owner() != self.id {
            warn!(task = %task.id(), kind = %O::KIND, "refusing to recover a task from another database");
            return Err(task);
        }
        if !task.is_ready() {
            warn!(task = %task.id(), kind = %O::KIND, "refusing to recover a task that is not ready");
            return Err(task);
        }

        let id = task.id();
        let completion = task.into_completion()?;
        match completion.connection {
            Some(conn) if completion.healthy => self.pool.release(conn),
            Some(conn) => {
                debug!(task = %id, connection = conn.id(), "discarding connection that failed its probe");
                self.pool.discard(conn);
            }
            None => self.pool.forget(),
        }
        self.pool.task_recovered();

        if let Some(err) = completion.errors.last() {
            error!(task = %id, kind = %O::KIND, "database error: {err}");
        }

        Ok(TaskOutcome::new(
            id,
            O::KIND,
            completion.output,
            completion.errors,
            completion.ran,
        ))
    }

    /// Current pool counters. `Display` renders the one-line status report.
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        self.pool.status()
    }

    /// Tasks dispatched and not yet recovered.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.pool.outstanding()
    }

    #[must_use]
    pub fn options(&self) -> &DatabaseOptions {
        &self.options
    }

    #[must_use]
    pub fn bot_id(&self) -> u32 {
        self.options.bot_id
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("target", &self.connector.describe())
            .field("status", &self.pool.status())
            .finish_non_exhaustive()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        let outstanding = self.pool.outstanding();
        if outstanding > 0 {
            warn!(outstanding, "shutting down with tasks that were never recovered");
        }
        let total = self.pool.total();
        let closed = self.pool.close_idle();
        info!("closed {closed}/{total} idle database connections");
    }
}
