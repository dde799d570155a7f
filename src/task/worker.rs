use std::sync::Arc;

use tokio::sync::oneshot;

use crate::connection::{Connection, Connector};
use crate::error::TaskError;

use super::operation::{Operation, Runner};

/// Everything a worker publishes when its task reaches the ready state.
#[derive(Debug)]
pub(crate) struct Completion<T> {
    pub(crate) output: T,
    pub(crate) errors: Vec<TaskError>,
    /// The connection, if one was lent or opened. `None` when opening failed.
    pub(crate) connection: Option<Connection>,
    /// `false` when the connection failed its probe and must not go back to the pool.
    pub(crate) healthy: bool,
    /// `false` when no worker ever ran the body.
    pub(crate) ran: bool,
}

/// Type-erased unit of work handed to the dispatcher.
pub(crate) trait Job: Send {
    /// Init, run and close the task, then publish its completion.
    fn run(self: Box<Self>);

    /// Publish a completion without running anything.
    fn abandon(self: Box<Self>, reason: TaskError);
}

pub(crate) struct TaskJob<O: Operation> {
    pub(crate) op: O,
    pub(crate) conn: Option<Connection>,
    pub(crate) connector: Arc<dyn Connector>,
    pub(crate) bot_id: u32,
    pub(crate) respond_to: oneshot::Sender<Completion<O::Output>>,
}

impl<O: Operation> Job for TaskJob<O> {
    fn run(self: Box<Self>) {
        let TaskJob {
            op,
            conn,
            connector,
            bot_id,
            respond_to,
        } = *self;
        let completion = run_task(op, conn, connector.as_ref(), bot_id);
        // A send error means the owner dropped the task; the connection closes with it.
        let _ = respond_to.send(completion);
    }

    fn abandon(self: Box<Self>, reason: TaskError) {
        let TaskJob {
            op, conn, respond_to, ..
        } = *self;
        let _ = respond_to.send(Completion {
            output: op.fallback(),
            errors: vec![reason],
            connection: conn,
            healthy: true,
            ran: false,
        });
    }
}

pub(crate) fn run_task<O: Operation>(
    op: O,
    conn: Option<Connection>,
    connector: &dyn Connector,
    bot_id: u32,
) -> Completion<O::Output> {
    let mut conn = match init(conn, connector) {
        Ok(conn) => conn,
        Err((connection, err)) => {
            return Completion {
                output: op.fallback(),
                errors: vec![err],
                connection,
                healthy: false,
                ran: true,
            };
        }
    };

    let mut runner = Runner::new(&mut conn, bot_id);
    let output = op.run(&mut runner);
    let errors = runner.into_errors();

    Completion {
        output,
        errors,
        connection: Some(conn),
        healthy: true,
        ran: true,
    }
}

// Open a connection when none was lent, otherwise probe the lent one.
fn init(
    conn: Option<Connection>,
    connector: &dyn Connector,
) -> Result<Connection, (Option<Connection>, TaskError)> {
    match conn {
        Some(mut conn) => match conn.ping() {
            Ok(()) => Ok(conn),
            Err(err) => Err((Some(conn), TaskError::connection(&err))),
        },
        None => connector
            .connect()
            .map_err(|err| (None, TaskError::connection(&err))),
    }
}
